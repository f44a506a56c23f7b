//! Constants used throughout the credstore library.
//!
//! This module provides central definitions for file names, path suffixes,
//! column names and validation thresholds.

use std::time::Duration;

/// Default file name of the primary credential file.
pub const DEFAULT_FILE_NAME: &str = "users.csv";

/// Suffix appended to the primary path for the pre-write snapshot.
pub const BACKUP_SUFFIX: &str = ".bak";

/// Suffix appended to the primary path for the lock token.
pub const LOCK_SUFFIX: &str = ".lock";

/// Suffix appended to the primary path for the file being written.
pub const STAGING_SUFFIX: &str = ".tmp";

/// Column order of the durable file. The header row always carries these names.
pub const COLUMNS: [&str; 4] = ["name", "email", "password", "is_logged_in"];

/// Minimum number of characters in a new password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Character used to hide the local part of an email in logs.
pub const MASK_CHAR: char = '*';

/// How long an operation waits for the store lock before giving up.
pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Delay between attempts to take the store lock.
pub const DEFAULT_LOCK_POLL_INTERVAL: Duration = Duration::from_millis(20);
