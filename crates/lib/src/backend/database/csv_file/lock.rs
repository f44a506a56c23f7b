//! Advisory file lock guarding the credential file.
//!
//! The lock lives in its own file next to the table so that the table itself
//! can be renamed and replaced while the lock is held.

use std::{
    fs::{File, OpenOptions},
    path::Path,
    thread,
    time::{Duration, Instant},
};

use fs2::FileExt;

use crate::backend::errors::StorageError;

/// Shared for readers, exclusive for writers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum LockMode {
    Shared,
    Exclusive,
}

/// Held lock; released on drop.
#[derive(Debug)]
pub(super) struct StoreLock {
    file: File,
    mode: LockMode,
}

impl StoreLock {
    /// Take the lock on `path`, polling every `poll` until `timeout` elapses.
    pub(super) fn acquire(
        path: &Path,
        mode: LockMode,
        timeout: Duration,
        poll: Duration,
    ) -> Result<Self, StorageError> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(path)
            .map_err(|source| StorageError::FileIo {
                operation: "open lock file",
                path: path.to_path_buf(),
                source,
            })?;

        let started = Instant::now();
        loop {
            // Fully qualified: std::fs::File has inherent lock methods on newer toolchains
            let attempt = match mode {
                LockMode::Shared => FileExt::try_lock_shared(&file),
                LockMode::Exclusive => FileExt::try_lock_exclusive(&file),
            };

            match attempt {
                Ok(()) => {
                    tracing::trace!(path = %path.display(), ?mode, "Acquired store lock");
                    return Ok(Self { file, mode });
                }
                Err(e) if is_contended(&e) => {
                    let waited = started.elapsed();
                    if waited >= timeout {
                        return Err(StorageError::LockTimeout {
                            path: path.to_path_buf(),
                            waited,
                        });
                    }
                    thread::sleep(poll.min(timeout - waited));
                }
                Err(source) => {
                    return Err(StorageError::FileIo {
                        operation: "lock",
                        path: path.to_path_buf(),
                        source,
                    });
                }
            }
        }
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            tracing::warn!(mode = ?self.mode, "Failed to release store lock: {e}");
        }
    }
}

fn is_contended(err: &std::io::Error) -> bool {
    err.kind() == std::io::ErrorKind::WouldBlock
        || err.raw_os_error() == fs2::lock_contended_error().raw_os_error()
}
