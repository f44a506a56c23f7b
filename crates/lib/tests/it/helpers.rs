//! Shared setup for integration tests.

#![allow(dead_code)]

use std::time::Duration;

use credstore::{
    CredentialStore, StoreConfig,
    backend::{UserStorage, database::CsvFileStorage},
    user::UserTable,
};
use tempfile::TempDir;

/// A password that passes the strength rules.
pub const STRONG_PASSWORD: &str = "Corr3ct-horse";

/// Store config inside `dir` with test-friendly lock timings.
pub fn test_config(dir: &TempDir) -> StoreConfig {
    StoreConfig::in_dir(dir.path())
        .with_lock_timeout(Duration::from_secs(30))
        .with_lock_poll_interval(Duration::from_millis(2))
}

/// A CSV-backed store in a fresh temporary directory.
///
/// Keep the returned `TempDir` alive for as long as the store is used.
pub fn setup_store() -> (CredentialStore, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = CredentialStore::open(test_config(&dir)).expect("Failed to open store");
    (store, dir)
}

/// A second, independent handle on the same file, as another process would have.
pub fn reopen(dir: &TempDir) -> CsvFileStorage {
    CsvFileStorage::open(test_config(dir)).expect("Failed to reopen store")
}

/// A store with one registered user.
pub fn setup_store_with_user(name: &str, email: &str) -> (CredentialStore, TempDir) {
    let (store, dir) = setup_store();
    store
        .create_user(name, email, STRONG_PASSWORD)
        .expect("Failed to create user");
    (store, dir)
}

/// Load the table through an independent handle.
pub fn load_from_disk(dir: &TempDir) -> UserTable {
    reopen(dir).load()
}
