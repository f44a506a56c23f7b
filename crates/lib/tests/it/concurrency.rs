//! Parallel writers against one credential file.
//!
//! Each thread gets its own `CredentialStore` over the same path, which is
//! as close to several server processes as a single test binary gets.

use std::{sync::Barrier, thread, time::Duration};

use credstore::{CredentialStore, backend::UserStorage};

use crate::helpers::*;

const WRITERS: usize = 8;

#[test]
fn test_parallel_signups_lose_no_accounts() {
    let dir = tempfile::tempdir().unwrap();
    let barrier = Barrier::new(WRITERS);

    thread::scope(|scope| {
        for i in 0..WRITERS {
            let dir = &dir;
            let barrier = &barrier;
            scope.spawn(move || {
                let store = CredentialStore::open(test_config(dir)).unwrap();
                barrier.wait();
                store
                    .create_user(&format!("User {i}"), &format!("user{i}@example.com"), STRONG_PASSWORD)
                    .expect("signup");
            });
        }
    });

    let table = load_from_disk(&dir);
    assert_eq!(table.len(), WRITERS);
    for i in 0..WRITERS {
        assert!(table.contains(&format!("user{i}@example.com")));
    }
}

#[test]
fn test_racing_signups_for_one_email_register_once() {
    let dir = tempfile::tempdir().unwrap();
    let barrier = Barrier::new(WRITERS);

    let successes: usize = thread::scope(|scope| {
        let handles: Vec<_> = (0..WRITERS)
            .map(|i| {
                let dir = &dir;
                let barrier = &barrier;
                scope.spawn(move || {
                    let store = CredentialStore::open(test_config(dir)).unwrap();
                    barrier.wait();
                    // Mixed case on purpose
                    let email = if i % 2 == 0 { "Race@Example.com" } else { "race@example.COM" };
                    store.signup(&format!("Racer {i}"), email, STRONG_PASSWORD)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|outcome| {
                if !outcome.success {
                    assert_eq!(outcome.message, "Email already registered");
                }
                outcome.success
            })
            .count()
    });

    assert_eq!(successes, 1);
    assert_eq!(load_from_disk(&dir).len(), 1);
}

#[test]
fn test_logins_and_logouts_do_not_clobber_signups() {
    let (store, dir) = setup_store_with_user("Ann", "ann@example.com");
    drop(store);

    thread::scope(|scope| {
        let dir = &dir;
        scope.spawn(move || {
            let store = CredentialStore::open(test_config(dir)).unwrap();
            for _ in 0..3 {
                store.authenticate_user("ann@example.com", STRONG_PASSWORD).unwrap();
                store.logout_user("ann@example.com").unwrap();
            }
        });
        scope.spawn(move || {
            let store = CredentialStore::open(test_config(dir)).unwrap();
            for i in 0..3 {
                store
                    .create_user("New", &format!("new{i}@example.com"), STRONG_PASSWORD)
                    .unwrap();
            }
        });
    });

    let table = load_from_disk(&dir);
    assert_eq!(table.len(), 4);
    assert!(!table.get("ann@example.com").unwrap().is_logged_in);
}

#[test]
fn test_held_lock_turns_into_busy_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(&dir)
        .with_lock_timeout(Duration::from_millis(100))
        .with_lock_poll_interval(Duration::from_millis(5));
    let store = CredentialStore::open(config).unwrap();
    store.create_user("Ann", "ann@example.com", STRONG_PASSWORD).unwrap();

    let holder = reopen(&dir);
    let entered = Barrier::new(2);
    let release = Barrier::new(2);

    thread::scope(|scope| {
        scope.spawn(|| {
            // Hold the writer lock from inside an update until told to stop
            holder
                .update(&mut |_table| {
                    entered.wait();
                    release.wait();
                    Ok(())
                })
                .unwrap();
        });

        entered.wait();
        let outcome = store.logout("ann@example.com");
        release.wait();

        assert!(!outcome.success);
        assert_eq!(outcome.message, credstore::user::outcome::BUSY_MESSAGE);
    });

    // Once released the store is usable again
    assert!(store.logout("ann@example.com").success);
}
