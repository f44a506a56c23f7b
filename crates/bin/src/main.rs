use std::process::ExitCode;

use clap::Parser;
use credstore::CredentialStore;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};
use output::OutputFormat;

fn main() -> ExitCode {
    // Logs go to stderr so --json output stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("credstore=warn".parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!("credstore command failed: {e}");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = cli.store.to_config();
    tracing::debug!(path = %config.path.display(), "Opening credential store");
    let store = CredentialStore::open(config)?;
    let format = OutputFormat::from_json_flag(cli.json);

    match &cli.command {
        Commands::Signup(args) => commands::signup(&store, args, format),
        Commands::Login(args) => commands::login(&store, args, format),
        Commands::Logout(args) => commands::logout(&store, args, format),
        Commands::List => commands::list(&store, format),
    }
}
