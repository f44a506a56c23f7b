//! Output formatting helpers for human-readable and JSON output.

use credstore::{Outcome, user::UserSummary};

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Human,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Human }
    }
}

/// Print an operation outcome. Failures go to stderr in human mode.
pub fn print_outcome(outcome: &Outcome, format: OutputFormat) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Human => {
            if outcome.success {
                println!("{}", outcome.message);
                if let Some(user) = &outcome.user {
                    println!("Name:   {}", user.name);
                    println!("Email:  {}", user.email);
                }
            } else {
                eprintln!("{}", outcome.message);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(outcome)?),
    }
    Ok(())
}

/// Print the account listing.
pub fn print_users(users: &[UserSummary], format: OutputFormat) -> Result<(), serde_json::Error> {
    match format {
        OutputFormat::Human if users.is_empty() => println!("No users found"),
        OutputFormat::Human => {
            let rows: Vec<Vec<String>> = users
                .iter()
                .map(|u| {
                    vec![
                        u.name.clone(),
                        u.email.clone(),
                        if u.is_logged_in { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            print_table(&["NAME", "EMAIL", "LOGGED IN"], &rows);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string(users)?),
    }
    Ok(())
}

/// Print a table with aligned columns in human-readable format.
///
/// `headers` and each row in `rows` must have the same length.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    for line in format_table(headers, rows) {
        println!("{line}");
    }
}

fn format_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    if rows.is_empty() {
        return Vec::new();
    }

    // Column width is the widest of header and cells, counted in chars
    let col_count = headers.len();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(col_count) {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let render = |cells: &mut dyn Iterator<Item = &str>| -> String {
        cells
            .enumerate()
            .map(|(i, cell)| format!("{:<width$}", cell, width = widths[i]))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render(&mut headers.iter().copied()));
    for row in rows {
        lines.push(render(&mut row.iter().take(col_count).map(String::as_str)));
    }
    lines
}
