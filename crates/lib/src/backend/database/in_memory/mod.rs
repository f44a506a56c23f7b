//! In-memory storage backend implementation
//!
//! This module provides an in-memory implementation of the `UserStorage`
//! trait, suitable for testing, development, or embedding where the table is
//! persisted by some other means.

use std::sync::Mutex;

use crate::Result;
use crate::backend::{UserStorage, errors::StorageError};
use crate::user::UserTable;

/// A mutex-guarded credential table.
///
/// `load` hands out clones, so callers never hold the lock while they work.
/// `update` mutates a working copy and swaps it in only on success, giving
/// the same all-or-nothing behaviour as the file backend.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    table: Mutex<UserTable>,
}

impl InMemoryStorage {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `table`.
    pub fn with_table(table: UserTable) -> Self {
        Self {
            table: Mutex::new(table),
        }
    }
}

impl UserStorage for InMemoryStorage {
    fn load(&self) -> UserTable {
        match self.table.lock() {
            Ok(table) => table.clone(),
            Err(_) => {
                tracing::warn!("In-memory user table lock poisoned, treating it as empty");
                UserTable::new()
            }
        }
    }

    fn save(&self, table: &UserTable) -> Result<()> {
        let mut stored = self.table.lock().map_err(|_| StorageError::Poisoned)?;
        *stored = table.clone();
        Ok(())
    }

    fn update(&self, mutate: &mut dyn FnMut(&mut UserTable) -> Result<()>) -> Result<()> {
        let mut stored = self.table.lock().map_err(|_| StorageError::Poisoned)?;
        let mut working = stored.clone();
        mutate(&mut working)?;
        *stored = working;
        Ok(())
    }
}
