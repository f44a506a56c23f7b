//! CSV encoding of the credential table.
//!
//! Decoding is lenient: unknown columns are ignored, missing columns are
//! backfilled, and rows that fail to parse are skipped. Encoding always
//! writes the full header in the fixed column order.

use std::io::{Read, Write};

use crate::constants::COLUMNS;
use crate::user::{UserRecord, UserTable};

const NAME: usize = 0;
const EMAIL: usize = 1;
const PASSWORD: usize = 2;
const IS_LOGGED_IN: usize = 3;

/// Parse a table from CSV text. Never fails; see the module docs.
pub(super) fn decode_table(reader: impl Read) -> UserTable {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = match csv_reader.headers() {
        Ok(headers) => headers.clone(),
        Err(e) => {
            tracing::warn!("Unreadable header row in user table: {e}");
            return UserTable::new();
        }
    };

    // Position of each known column in this file, if present.
    // Spreadsheet exports prefix the first header with a BOM.
    let positions: Vec<Option<usize>> = COLUMNS
        .iter()
        .map(|column| {
            headers.iter().position(|h| {
                h.trim_start_matches('\u{feff}')
                    .trim()
                    .eq_ignore_ascii_case(column)
            })
        })
        .collect();

    if positions[EMAIL].is_none() {
        if !headers.is_empty() {
            tracing::warn!("User table has no email column; treating it as empty");
        }
        return UserTable::new();
    }

    let mut skipped = 0usize;
    let records = csv_reader.records().filter_map(|row| match row {
        Ok(row) => {
            let field = |column: usize| {
                positions[column]
                    .and_then(|idx| row.get(idx))
                    .unwrap_or_default()
            };
            Some(UserRecord {
                name: field(NAME).trim().to_string(),
                email: field(EMAIL).to_string(),
                password: field(PASSWORD).trim().to_string(),
                is_logged_in: parse_flag(field(IS_LOGGED_IN)),
            })
        }
        Err(e) => {
            skipped += 1;
            tracing::debug!("Skipping unparsable user row: {e}");
            None
        }
    });
    let table = UserTable::from_records(records);

    if skipped > 0 {
        tracing::warn!(skipped, "Skipped unparsable rows while loading user table");
    }
    table
}

/// Write `table` as CSV, header first. Returns the inner writer, flushed.
pub(super) fn encode_table<W: Write>(table: &UserTable, writer: W) -> csv::Result<W> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(writer);

    csv_writer.write_record(COLUMNS)?;
    for record in table {
        csv_writer.write_record([
            record.name.as_str(),
            record.email.as_str(),
            record.password.as_str(),
            if record.is_logged_in { "true" } else { "false" },
        ])?;
    }

    csv_writer.flush()?;
    csv_writer.into_inner().map_err(|e| {
        let err = e.error();
        csv::Error::from(std::io::Error::new(err.kind(), err.to_string()))
    })
}

/// Lenient boolean: legacy files spell it `True`/`False`, blanks mean false.
fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "t" | "y"
    )
}
