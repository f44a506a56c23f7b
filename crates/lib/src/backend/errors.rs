//! Storage error types for the credstore backend.
//!
//! This module defines structured error types for storage operations,
//! carrying the path and step that failed so log lines are actionable.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while reading or writing the credential table.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Existing variants will not be removed in minor versions
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store lock was held by someone else for longer than the timeout.
    #[error("Resource busy: could not lock {} within {waited:?}", path.display())]
    LockTimeout {
        /// The lock file
        path: PathBuf,
        /// How long we waited
        waited: Duration,
    },

    /// File I/O error.
    #[error("File I/O error while trying to {operation} {}", path.display())]
    FileIo {
        /// Short description of the step that failed
        operation: &'static str,
        /// The file involved
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The table could not be encoded as CSV.
    #[error("CSV encoding failed for {}", path.display())]
    Encoding {
        /// The file being written
        path: PathBuf,
        /// The underlying CSV error
        #[source]
        source: csv::Error,
    },

    /// A failed save could not put the previous snapshot back in place.
    #[error("Rollback from {} failed after an aborted save", backup.display())]
    RollbackFailed {
        /// The backup that should have been restored
        backup: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// An in-process lock was poisoned by a panicking writer.
    #[error("In-memory store lock poisoned")]
    Poisoned,

    /// A backend reported success from `update` without running the mutation.
    #[error("Storage backend returned from update without applying it")]
    UpdateNotApplied,
}

impl StorageError {
    /// Check if this error is a lock timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, StorageError::LockTimeout { .. })
    }

    /// Check if this error is I/O related.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            StorageError::FileIo { .. }
                | StorageError::Encoding { .. }
                | StorageError::RollbackFailed { .. }
        )
    }

    /// Check if the durable file may not reflect its pre-call state.
    pub fn is_integrity_error(&self) -> bool {
        matches!(self, StorageError::RollbackFailed { .. })
    }
}

// Conversion from StorageError to the main Error type
impl From<StorageError> for crate::Error {
    fn from(err: StorageError) -> Self {
        crate::Error::Storage(err)
    }
}
