//! CLI argument definitions for the credstore binary.

use std::{path::PathBuf, time::Duration};

use clap::{Parser, Subcommand};
use credstore::{StoreConfig, constants::DEFAULT_FILE_NAME};

/// Flat-file user credential store
#[derive(Parser, Debug)]
#[command(name = "credstore")]
#[command(about = "credstore: register, log in and log out users backed by a CSV file")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Print results as JSON instead of human-readable text
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Register a new account
    Signup(SignupArgs),
    /// Check a password and mark the account as logged in
    Login(LoginArgs),
    /// Mark an account as logged out
    Logout(LogoutArgs),
    /// List registered accounts without their password hashes
    List,
}

/// Where the credential file lives and how long to wait for it
#[derive(clap::Args, Debug)]
pub struct StoreArgs {
    /// Directory holding the credential file and its backup
    #[arg(short = 'D', long, default_value = ".", env = "CREDSTORE_DATA_DIR")]
    pub data_dir: PathBuf,

    /// Credential file name inside the data directory
    #[arg(short, long, default_value = DEFAULT_FILE_NAME, env = "CREDSTORE_FILE")]
    pub file: String,

    /// Milliseconds to wait for the file lock before giving up
    #[arg(long, env = "CREDSTORE_LOCK_TIMEOUT_MS")]
    pub lock_timeout_ms: Option<u64>,
}

impl StoreArgs {
    /// Build the library config these arguments describe.
    pub fn to_config(&self) -> StoreConfig {
        let config = StoreConfig::new(self.data_dir.join(&self.file));
        match self.lock_timeout_ms {
            Some(ms) => config.with_lock_timeout(Duration::from_millis(ms)),
            None => config,
        }
    }
}

/// Arguments for the signup command
#[derive(clap::Args, Debug)]
pub struct SignupArgs {
    /// Display name
    #[arg(short, long)]
    pub name: String,

    /// Email address, used as the account key
    #[arg(short, long)]
    pub email: String,

    /// Password; read from the first line of stdin when omitted
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for the login command
#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    /// Email address of the account
    #[arg(short, long)]
    pub email: String,

    /// Password; read from the first line of stdin when omitted
    #[arg(short, long)]
    pub password: Option<String>,
}

/// Arguments for the logout command
#[derive(clap::Args, Debug)]
pub struct LogoutArgs {
    /// Email address of the account
    #[arg(short, long)]
    pub email: String,
}
