//!
//! credstore: a flat-file credential store.
//! This library keeps registered accounts, their salted password hashes and a
//! persisted session flag in a single CSV file, without a database engine.
//!
//! ## Core Concepts
//!
//! * **Records (`user::UserRecord`)**: One row per account, keyed by the lower-cased email.
//! * **Tables (`user::UserTable`)**: The full set of records, read fresh and written back in full by every operation.
//! * **Storage (`backend::UserStorage`)**: A pluggable persistence port. Implementations:
//!     * **CsvFileStorage (`backend::database::CsvFileStorage`)**: CSV file guarded by an advisory file lock, with backup-and-rename saves.
//!     * **InMemoryStorage (`backend::database::InMemoryStorage`)**: A mutex-guarded table for tests and embedding.
//! * **CredentialStore (`user::CredentialStore`)**: The account operations (`create_user`, `authenticate_user`,
//!   `logout_user`), each running as one critical section over the storage.
//! * **Outcome (`user::Outcome`)**: The `(success, message)` shape handed to callers such as an HTTP layer.

pub mod backend;
pub mod config;
pub mod constants;
pub mod user;
pub mod validation;

pub use config::StoreConfig;
pub use user::{CredentialStore, Outcome};

/// Result type used throughout the credstore library.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse error taxonomy surfaced to callers of the account operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input; the caller can resubmit corrected input.
    Validation,
    /// Email already registered.
    Conflict,
    /// Credential mismatch. Never says whether the email exists.
    Auth,
    /// Logout of an unknown email.
    NotFound,
    /// Lock timeout, I/O failure or failed rollback.
    Storage,
}

/// Common error type for the credstore library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured account errors from the user module
    #[error(transparent)]
    User(user::UserError),

    /// Structured storage errors from the backend module
    #[error(transparent)]
    Storage(backend::StorageError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::User(_) => "user",
            Error::Storage(_) => "backend",
        }
    }

    /// Classify this error into the caller-facing taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Storage(_) => ErrorKind::Storage,
            Error::User(user_err) => user_err.kind(),
        }
    }

    /// Check if this error was caused by malformed or missing input.
    pub fn is_validation_error(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Check if this error indicates a conflict (already exists).
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Conflict
    }

    /// Check if this error is authentication-related.
    pub fn is_authentication_error(&self) -> bool {
        self.kind() == ErrorKind::Auth
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if this error is storage-related.
    pub fn is_storage_error(&self) -> bool {
        self.kind() == ErrorKind::Storage
    }

    /// Check if this error indicates the store lock could not be acquired in time.
    pub fn is_timeout_error(&self) -> bool {
        match self {
            Error::Storage(storage_err) => storage_err.is_timeout(),
            _ => false,
        }
    }
}
