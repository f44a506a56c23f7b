//! Subcommand handlers. Each returns whether the operation succeeded.

use std::io::{self, BufRead};

use credstore::CredentialStore;

use crate::{
    cli::{LoginArgs, LogoutArgs, SignupArgs},
    output::{OutputFormat, print_outcome, print_users},
};

type CmdResult = Result<bool, Box<dyn std::error::Error>>;

pub fn signup(store: &CredentialStore, args: &SignupArgs, format: OutputFormat) -> CmdResult {
    let password = password_or_stdin(args.password.as_deref())?;
    let outcome = store.signup(&args.name, &args.email, &password);
    print_outcome(&outcome, format)?;
    Ok(outcome.success)
}

pub fn login(store: &CredentialStore, args: &LoginArgs, format: OutputFormat) -> CmdResult {
    let password = password_or_stdin(args.password.as_deref())?;
    let outcome = store.login(&args.email, &password);
    print_outcome(&outcome, format)?;
    Ok(outcome.success)
}

pub fn logout(store: &CredentialStore, args: &LogoutArgs, format: OutputFormat) -> CmdResult {
    let outcome = store.logout(&args.email);
    print_outcome(&outcome, format)?;
    Ok(outcome.success)
}

pub fn list(store: &CredentialStore, format: OutputFormat) -> CmdResult {
    print_users(&store.list_users(), format)?;
    Ok(true)
}

/// Use the given password, or read one line from stdin.
fn password_or_stdin(password: Option<&str>) -> io::Result<String> {
    match password {
        Some(p) => Ok(p.to_string()),
        None => read_password_line(io::stdin().lock()),
    }
}

fn read_password_line(mut input: impl BufRead) -> io::Result<String> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
