//! Account operations over a `UserStorage`.
//!
//! Every operation reads the table fresh, mutates it and writes it back in
//! one critical section (`UserStorage::update`), so two requests racing on
//! the same email cannot both pass the "already registered" check.

use zeroize::Zeroizing;

use super::{
    crypto::{hash_password, prepare_dummy_hash, verify_against_dummy, verify_password},
    errors::UserError,
    outcome::Outcome,
    types::{UserIdentity, UserRecord, UserSummary, UserTable, normalize_email},
};
use crate::{
    Result, StoreConfig,
    backend::{
        StorageError, UserStorage,
        database::{CsvFileStorage, InMemoryStorage},
    },
    validation::{is_strong_password, is_valid_email, mask_email},
};

/// The credential store: account operations on an injected storage backend.
#[derive(Debug)]
pub struct CredentialStore {
    storage: Box<dyn UserStorage>,
}

impl CredentialStore {
    /// Create a store over any backend.
    pub fn new(storage: Box<dyn UserStorage>) -> Self {
        prepare_dummy_hash();
        Self { storage }
    }

    /// Create a store backed by the CSV file described in `config`.
    pub fn open(config: StoreConfig) -> Result<Self> {
        Ok(Self::new(Box::new(CsvFileStorage::open(config)?)))
    }

    /// Create a store backed by an empty in-memory table.
    pub fn in_memory() -> Self {
        Self::new(Box::new(InMemoryStorage::new()))
    }

    /// The underlying storage backend.
    pub fn storage(&self) -> &dyn UserStorage {
        self.storage.as_ref()
    }

    /// Register a new account.
    ///
    /// Name, email and password are trimmed and the email lower-cased before
    /// validation. The password is stored only as an Argon2id hash.
    pub fn create_user(&self, name: &str, email: &str, password: &str) -> Result<UserIdentity> {
        let name = name.trim();
        let email = normalize_email(email);
        let password = Zeroizing::new(password.trim().to_string());

        if name.is_empty() || email.is_empty() || password.is_empty() {
            return Err(UserError::MissingFields.into());
        }
        if !is_valid_email(&email) {
            return Err(UserError::InvalidEmail.into());
        }
        if !is_strong_password(&password) {
            return Err(UserError::WeakPassword.into());
        }

        // Hash before taking the lock; Argon2 is the slow part
        let record = UserRecord::new(name, &email, hash_password(password.as_str())?);
        let identity = record.identity();

        self.transact(|table| table.insert(record.clone()))?;

        tracing::info!(email = %mask_email(&email), "Registered user");
        Ok(identity)
    }

    /// Check a password and mark the account as logged in.
    ///
    /// Unknown email and wrong password fail with the same
    /// `InvalidCredentials` error, and both cost one Argon2 verification.
    /// The login only counts once the flag has been saved.
    pub fn authenticate_user(&self, email: &str, password: &str) -> Result<UserIdentity> {
        let email = normalize_email(email);
        let password = Zeroizing::new(password.trim().to_string());

        if email.is_empty() || password.is_empty() {
            return Err(UserError::MissingCredentials.into());
        }

        let result = self.transact(|table| {
            let Some(record) = table.get_mut(&email) else {
                verify_against_dummy(password.as_str());
                return Err(UserError::InvalidCredentials.into());
            };
            verify_password(password.as_str(), &record.password)?;
            record.is_logged_in = true;
            Ok(record.identity())
        });

        match &result {
            Ok(_) => tracing::info!(email = %mask_email(&email), "User logged in"),
            Err(e) if e.is_authentication_error() => {
                tracing::info!(email = %mask_email(&email), "Rejected login")
            }
            Err(_) => {}
        }
        result
    }

    /// Clear the session flag of an account.
    ///
    /// Logging out an account that is already logged out succeeds.
    pub fn logout_user(&self, email: &str) -> Result<()> {
        let email = normalize_email(email);

        self.transact(|table| {
            if table.is_empty() {
                return Err(UserError::NoUsers.into());
            }
            let record = table
                .get_mut(&email)
                .ok_or_else(|| UserError::EmailNotFound {
                    masked_email: mask_email(&email),
                })?;
            record.is_logged_in = false;
            Ok(())
        })?;

        tracing::info!(email = %mask_email(&email), "User logged out");
        Ok(())
    }

    /// Apply `apply` to the record for `email` inside one critical section.
    ///
    /// Fails with `EmailNotFound` if there is no such record. The change is
    /// saved only if `apply` succeeds.
    pub fn update_user<T>(
        &self,
        email: &str,
        apply: impl FnOnce(&mut UserRecord) -> Result<T>,
    ) -> Result<T> {
        let email = normalize_email(email);
        let mut apply = Some(apply);

        self.transact(|table| {
            let record = table
                .get_mut(&email)
                .ok_or_else(|| UserError::EmailNotFound {
                    masked_email: mask_email(&email),
                })?;
            let apply = apply.take().ok_or(StorageError::UpdateNotApplied)?;
            apply(record)
        })
    }

    /// All accounts with their session flags, in table order. Never exposes hashes.
    pub fn list_users(&self) -> Vec<UserSummary> {
        self.storage.load().iter().map(UserRecord::summary).collect()
    }

    /// `create_user` folded into an `Outcome`.
    pub fn signup(&self, name: &str, email: &str, password: &str) -> Outcome {
        Outcome::from_result(self.create_user(name, email, password), |_| {
            Outcome::success("Signup successful")
        })
    }

    /// `authenticate_user` folded into an `Outcome` carrying the identity.
    pub fn login(&self, email: &str, password: &str) -> Outcome {
        Outcome::from_result(self.authenticate_user(email, password), |user| {
            Outcome::success("Login successful").with_user(user)
        })
    }

    /// `logout_user` folded into an `Outcome`.
    pub fn logout(&self, email: &str) -> Outcome {
        Outcome::from_result(self.logout_user(email), |()| {
            Outcome::success("Logout successful")
        })
    }

    /// Run `f` on the table inside one storage critical section.
    fn transact<T>(&self, mut f: impl FnMut(&mut UserTable) -> Result<T>) -> Result<T> {
        let mut output = None;
        self.storage.update(&mut |table: &mut UserTable| {
            output = Some(f(table)?);
            Ok(())
        })?;
        output.ok_or_else(|| StorageError::UpdateNotApplied.into())
    }
}
