//! User system for credstore
//!
//! Provides account registration, password authentication and a persisted
//! session flag on top of a pluggable `UserStorage`.

pub mod crypto;
pub mod errors;
pub mod outcome;
pub mod store;
pub mod types;

pub use errors::UserError;
pub use outcome::Outcome;
pub use store::CredentialStore;
pub use types::*;
