//! Error types for the user system
//!
//! The `Display` text of every variant is safe to show to the person at the
//! other end of the request: it never carries a full email, a hash, or a
//! password.
use thiserror::Error;

use crate::ErrorKind;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Email and password are required")]
    MissingCredentials,

    #[error("Invalid email format")]
    InvalidEmail,

    #[error(
        "Password is too weak: use at least 8 characters with upper and lower case letters, a digit and a symbol"
    )]
    WeakPassword,

    #[error("Email already registered")]
    EmailAlreadyRegistered { masked_email: String },

    /// Same message for unknown email and wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("No users found")]
    NoUsers,

    #[error("Email not found")]
    EmailNotFound { masked_email: String },

    #[error("Password hashing failed: {reason}")]
    HashingFailed { reason: String },
}

impl UserError {
    /// Classify this error into the caller-facing taxonomy.
    ///
    /// Hashing failures are local faults, so they count as storage errors.
    pub fn kind(&self) -> ErrorKind {
        match self {
            UserError::MissingFields
            | UserError::MissingCredentials
            | UserError::InvalidEmail
            | UserError::WeakPassword => ErrorKind::Validation,
            UserError::EmailAlreadyRegistered { .. } => ErrorKind::Conflict,
            UserError::InvalidCredentials => ErrorKind::Auth,
            UserError::NoUsers | UserError::EmailNotFound { .. } => ErrorKind::NotFound,
            UserError::HashingFailed { .. } => ErrorKind::Storage,
        }
    }

    /// Check if this error indicates a resource was not found.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

impl From<UserError> for crate::Error {
    fn from(err: UserError) -> Self {
        crate::Error::User(err)
    }
}
