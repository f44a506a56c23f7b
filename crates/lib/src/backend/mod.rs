//! Storage backends for the credential table
//!
//! This module provides the `UserStorage` trait and its implementations
//! organized by category (currently only `database`).
//!
//! The `UserStorage` trait is the persistence port of the store. It lets the
//! account logic in `user::CredentialStore` stay independent of where the
//! table lives, so tests can swap the CSV file for an in-memory table.

use std::fmt::Debug;

use crate::Result;
use crate::user::UserTable;

// Category modules
pub mod database;
pub mod errors;

pub use errors::StorageError;

/// Persistence port for the credential table.
///
/// Implementations must be `Send` and `Sync` so one store can serve
/// concurrent requests, and must keep every single `load` and `save`
/// isolated from concurrent writers.
///
/// ## Critical sections
///
/// `load` and `save` are each atomic on their own, but a caller doing
/// `load`, then a mutation, then `save` can lose a concurrent update in
/// between. Account operations therefore go through `update`, which holds
/// the writer lock across the whole read-modify-write.
pub trait UserStorage: Send + Sync + Debug {
    /// Read the current table.
    ///
    /// Never fails. Any I/O or structural failure is logged and degrades to
    /// an empty table, so a damaged store reads as "no users" rather than
    /// taking the caller down.
    fn load(&self) -> UserTable;

    /// Replace the stored table with `table`.
    ///
    /// On failure the previous durable state is left in place.
    fn save(&self, table: &UserTable) -> Result<()>;

    /// Run `mutate` on a freshly loaded table inside one critical section.
    ///
    /// The table is persisted only when `mutate` returns `Ok`; an error from
    /// `mutate` discards the mutation and is returned unchanged.
    fn update(&self, mutate: &mut dyn FnMut(&mut UserTable) -> Result<()>) -> Result<()>;
}
