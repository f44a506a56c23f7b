//! On-disk format, legacy files and crash recovery.

use std::{collections::HashSet, fs};

use credstore::{
    backend::UserStorage,
    user::{UserRecord, UserTable},
};

use crate::helpers::*;

fn as_set(table: &UserTable) -> HashSet<(String, String, String, bool)> {
    table
        .iter()
        .map(|r| {
            (
                r.name.clone(),
                r.email.clone(),
                r.password.clone(),
                r.is_logged_in,
            )
        })
        .collect()
}

#[test]
fn test_file_layout() {
    let (store, dir) = setup_store_with_user("Ann", "ann@example.com");
    let path = reopen(&dir).path().to_path_buf();
    drop(store);

    let text = fs::read_to_string(&path).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some("name,email,password,is_logged_in"));
    let row = lines.next().unwrap();
    // PHC strings contain commas, so the hash column is quoted
    assert!(row.starts_with("Ann,ann@example.com,\"$argon2id$"));
    assert!(row.ends_with(",false"));
    assert_eq!(lines.next(), None);
}

#[test]
fn test_save_of_fresh_load_round_trips() {
    let (store, dir) = setup_store_with_user("Ann", "ann@example.com");
    store.create_user("Bob, Jr.", "bob@example.com", STRONG_PASSWORD).unwrap();
    store.authenticate_user("bob@example.com", STRONG_PASSWORD).unwrap();

    let storage = reopen(&dir);
    let before = storage.load();
    storage.save(&before).unwrap();
    let after = storage.load();

    assert_eq!(as_set(&before), as_set(&after));
}

#[test]
fn test_legacy_file_loads_and_upgrades() {
    let (store, dir) = setup_store();
    let storage = reopen(&dir);

    // Older files: capitalized booleans, a blank flag, a duplicate, a blank email,
    // and no trailing column for one row
    fs::write(
        storage.path(),
        "name,email,password,is_logged_in\n\
         Old Ann,ann@example.com,h1,True\n\
         Bob,bob@example.com,h2,\n\
         Nobody,,h3,True\n\
         Cy,cy@example.com,h4\n\
         New Ann,ANN@example.com,h5,False\n",
    )
    .unwrap();

    let table = storage.load();
    assert_eq!(table.len(), 3);
    let ann = table.get("ann@example.com").unwrap();
    assert_eq!(ann.name, "New Ann");
    assert_eq!(ann.password, "h5");
    assert!(!ann.is_logged_in);
    assert!(!table.get("cy@example.com").unwrap().is_logged_in);

    // The next write rewrites the file in the current format
    store.create_user("Dee", "dee@example.com", STRONG_PASSWORD).unwrap();
    let text = fs::read_to_string(storage.path()).unwrap();
    assert!(!text.contains("True"));
    assert!(!text.contains("Old Ann"));
    assert_eq!(storage.load().len(), 4);
}

#[test]
fn test_legacy_plaintext_password_never_authenticates() {
    let (store, dir) = setup_store();
    let storage = reopen(&dir);
    storage
        .save(&UserTable::from_records([UserRecord::new(
            "Legacy",
            "legacy@example.com",
            STRONG_PASSWORD,
        )]))
        .unwrap();

    let outcome = store.login("legacy@example.com", STRONG_PASSWORD);
    assert!(!outcome.success);
    assert_eq!(outcome.message, "Invalid email or password");
}

#[test]
fn test_crash_after_backup_rename_recovers_backup() {
    let (store, dir) = setup_store_with_user("Ann", "ann@example.com");
    store.create_user("Bob", "bob@example.com", STRONG_PASSWORD).unwrap();
    let storage = reopen(&dir);
    let expected = storage.load();
    assert_eq!(expected.len(), 2);

    // Interrupted save: snapshot taken, nothing renamed into place yet
    let config = storage.config().clone();
    fs::rename(&config.path, config.backup_path()).unwrap();
    assert_eq!(storage.load(), expected);

    // Interrupted with the new file created but empty
    fs::write(&config.path, "").unwrap();
    assert_eq!(storage.load(), expected);
    fs::remove_file(&config.path).unwrap();

    // The store keeps working from the recovered state
    store.create_user("Cy", "cy@example.com", STRONG_PASSWORD).unwrap();
    let table = storage.load();
    assert_eq!(table.len(), 3);
    assert!(table.contains("ann@example.com"));
}

#[test]
fn test_failed_save_leaves_accounts_untouched() {
    let (store, dir) = setup_store_with_user("Ann", "ann@example.com");
    let storage = reopen(&dir);
    let before = storage.load();

    fs::create_dir(storage.config().staging_path()).unwrap();
    let outcome = store.signup("Bob", "bob@example.com", STRONG_PASSWORD);
    assert!(!outcome.success);
    assert_eq!(outcome.message, credstore::user::outcome::STORAGE_MESSAGE);

    assert_eq!(storage.load(), before);
    fs::remove_dir(storage.config().staging_path()).unwrap();

    // With the obstacle gone the same signup goes through
    assert!(store.signup("Bob", "bob@example.com", STRONG_PASSWORD).success);
}

#[test]
fn test_failed_login_save_does_not_log_in() {
    let (store, dir) = setup_store_with_user("Ann", "ann@example.com");
    let storage = reopen(&dir);

    fs::create_dir(storage.config().staging_path()).unwrap();
    let err = store
        .authenticate_user("ann@example.com", STRONG_PASSWORD)
        .unwrap_err();
    assert!(err.is_storage_error());
    assert!(!storage.load().get("ann@example.com").unwrap().is_logged_in);
}

#[test]
fn test_hand_edited_file_is_trusted_over_backup() {
    let (store, dir) = setup_store_with_user("Ann", "ann@example.com");
    store.create_user("Bob", "bob@example.com", STRONG_PASSWORD).unwrap();
    let storage = reopen(&dir);

    // Appended by an editor that does not add a final newline
    let mut text = fs::read_to_string(storage.path()).unwrap();
    text.push_str("Cy,cy@example.com,h3,false");
    fs::write(storage.path(), text).unwrap();
    assert_eq!(storage.load().len(), 3);

    store.create_user("Dee", "dee@example.com", STRONG_PASSWORD).unwrap();
    storage.save(&storage.load()).unwrap();

    let table = load_from_disk(&dir);
    for email in ["ann@example.com", "bob@example.com", "cy@example.com", "dee@example.com"] {
        assert!(table.contains(email), "{email} was lost");
    }
}
