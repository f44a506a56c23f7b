//! Caller-facing result of an account operation.
//!
//! An HTTP handler or CLI only needs `(success, message)` plus, after a
//! login, the identity of the user. Errors are folded in here so nothing
//! propagates past the store boundary as a fault.

use serde::{Deserialize, Serialize};

use super::types::UserIdentity;
use crate::{Error, ErrorKind, Result};

/// Message shown when the store lock could not be taken in time.
pub const BUSY_MESSAGE: &str = "Resource busy, please retry";

/// Message shown for any other storage failure.
pub const STORAGE_MESSAGE: &str = "Storage unavailable, please retry";

/// `(success, message)` plus an optional identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Whether the operation took effect
    pub success: bool,
    /// Text safe to show to the end user
    pub message: String,
    /// Identity of the user acted on, set after a login
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserIdentity>,
    /// Error classification, absent on success
    #[serde(skip)]
    pub kind: Option<ErrorKind>,
}

impl Outcome {
    /// A successful outcome.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            user: None,
            kind: None,
        }
    }

    /// Attach the identity of the user the operation acted on.
    pub fn with_user(mut self, user: UserIdentity) -> Self {
        self.user = Some(user);
        self
    }

    /// A failed outcome built from an error.
    ///
    /// Validation, conflict, auth and not-found errors carry their own
    /// user-safe text. Storage failures are logged in full and reported
    /// generically.
    pub fn failure(err: &Error) -> Self {
        let kind = err.kind();
        let message = match kind {
            ErrorKind::Storage if err.is_timeout_error() => {
                tracing::warn!("Credential store busy: {err}");
                BUSY_MESSAGE.to_string()
            }
            ErrorKind::Storage => {
                tracing::error!(module = err.module(), "Credential store failure: {err}");
                STORAGE_MESSAGE.to_string()
            }
            _ => err.to_string(),
        };

        Self {
            success: false,
            message,
            user: None,
            kind: Some(kind),
        }
    }

    /// Fold an operation result into an outcome.
    pub fn from_result<T>(
        result: Result<T>,
        on_success: impl FnOnce(T) -> Outcome,
    ) -> Self {
        match result {
            Ok(value) => on_success(value),
            Err(err) => Self::failure(&err),
        }
    }

    /// The bare `(success, message)` pair.
    pub fn into_parts(self) -> (bool, String) {
        (self.success, self.message)
    }
}
