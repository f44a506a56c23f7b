//! Store configuration.
//!
//! A `StoreConfig` names the primary credential file and the locking budget.
//! The backup, staging and lock paths are all derived from the primary path.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::constants::{
    BACKUP_SUFFIX, DEFAULT_FILE_NAME, DEFAULT_LOCK_POLL_INTERVAL, DEFAULT_LOCK_TIMEOUT,
    LOCK_SUFFIX, STAGING_SUFFIX,
};

/// Configuration for a file-backed credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    /// Path of the primary CSV file
    pub path: PathBuf,
    /// Upper bound on how long any single operation waits for the lock
    pub lock_timeout: Duration,
    /// Delay between lock attempts while waiting
    pub lock_poll_interval: Duration,
}

impl StoreConfig {
    /// Create a configuration for the given primary file with default lock settings.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
            lock_poll_interval: DEFAULT_LOCK_POLL_INTERVAL,
        }
    }

    /// Create a configuration for `users.csv` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_FILE_NAME))
    }

    /// Set the lock timeout.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Set the delay between lock attempts. Zero is raised to one millisecond.
    pub fn with_lock_poll_interval(mut self, interval: Duration) -> Self {
        self.lock_poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Path of the pre-write snapshot.
    pub fn backup_path(&self) -> PathBuf {
        with_suffix(&self.path, BACKUP_SUFFIX)
    }

    /// Path of the lock token.
    pub fn lock_path(&self) -> PathBuf {
        with_suffix(&self.path, LOCK_SUFFIX)
    }

    /// Path the new table is written to before it replaces the primary.
    pub fn staging_path(&self) -> PathBuf {
        with_suffix(&self.path, STAGING_SUFFIX)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_FILE_NAME)
    }
}

/// Append `suffix` to the full file name (`users.csv` -> `users.csv.bak`).
fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
