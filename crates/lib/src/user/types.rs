//! Core data types for the user system

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::UserError;
use crate::Result;
use crate::validation::mask_email;

/// Trim and lower-case an email so it can be used as the table key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// One account row in the credential table.
///
/// `email` is the unique key and is always stored trimmed and lower-cased.
/// `password` holds an Argon2id hash in PHC format, never the plaintext.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct UserRecord {
    /// Display name
    pub name: String,

    /// Normalized email (login identifier)
    pub email: String,

    /// Password hash (PHC string)
    pub password: String,

    /// Persisted session flag
    pub is_logged_in: bool,
}

impl UserRecord {
    /// Build a logged-out record, normalizing name and email.
    pub fn new(
        name: impl AsRef<str>,
        email: impl AsRef<str>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            name: name.as_ref().trim().to_string(),
            email: normalize_email(email.as_ref()),
            password: password_hash.into(),
            is_logged_in: false,
        }
    }

    /// The caller-facing projection of this record.
    pub fn identity(&self) -> UserIdentity {
        UserIdentity {
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }

    /// Identity plus session flag, for listings.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            name: self.name.clone(),
            email: self.email.clone(),
            is_logged_in: self.is_logged_in,
        }
    }
}

// Hand-written so hashes and full addresses never end up in logs via `{:?}`.
impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("name", &self.name)
            .field("email", &mask_email(&self.email))
            .field("password", &"<redacted>")
            .field("is_logged_in", &self.is_logged_in)
            .finish()
    }
}

/// Identity returned to callers after a successful login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    /// Display name
    pub name: String,
    /// Normalized email
    pub email: String,
}

/// Listing entry: identity plus the persisted session flag.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// Display name
    pub name: String,
    /// Normalized email
    pub email: String,
    /// Persisted session flag
    pub is_logged_in: bool,
}

/// The full credential table.
///
/// Holds at most one record per normalized email. Records keep the order in
/// which they were inserted; a record that replaced an earlier duplicate
/// takes the later position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserTable {
    records: Vec<UserRecord>,
}

impl UserTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from raw records.
    ///
    /// Emails are normalized, records with an empty email are dropped, and
    /// when two records share an email the later one wins.
    pub fn from_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let mut slots: Vec<Option<UserRecord>> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for mut record in records {
            record.email = normalize_email(&record.email);
            if record.email.is_empty() {
                continue;
            }
            if let Some(previous) = positions.insert(record.email.clone(), slots.len()) {
                tracing::debug!(
                    email = %mask_email(&record.email),
                    "Duplicate email in table, keeping the later record"
                );
                slots[previous] = None;
            }
            slots.push(Some(record));
        }

        Self {
            records: slots.into_iter().flatten().collect(),
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over records in table order.
    pub fn iter(&self) -> std::slice::Iter<'_, UserRecord> {
        self.records.iter()
    }

    /// Look up a record by email (any case, surrounding whitespace ignored).
    pub fn get(&self, email: &str) -> Option<&UserRecord> {
        let key = normalize_email(email);
        self.records.iter().find(|r| r.email == key)
    }

    /// Mutable lookup by email.
    pub fn get_mut(&mut self, email: &str) -> Option<&mut UserRecord> {
        let key = normalize_email(email);
        self.records.iter_mut().find(|r| r.email == key)
    }

    /// Whether a record exists for `email`.
    pub fn contains(&self, email: &str) -> bool {
        self.get(email).is_some()
    }

    /// Append a new record.
    ///
    /// Fails with `EmailAlreadyRegistered` if the email is taken and with
    /// `MissingFields` if the record has no email.
    pub fn insert(&mut self, mut record: UserRecord) -> Result<()> {
        record.email = normalize_email(&record.email);
        if record.email.is_empty() {
            return Err(UserError::MissingFields.into());
        }
        if self.contains(&record.email) {
            return Err(UserError::EmailAlreadyRegistered {
                masked_email: mask_email(&record.email),
            }
            .into());
        }
        self.records.push(record);
        Ok(())
    }

    /// Consume the table, returning its records.
    pub fn into_records(self) -> Vec<UserRecord> {
        self.records
    }
}

impl FromIterator<UserRecord> for UserTable {
    fn from_iter<I: IntoIterator<Item = UserRecord>>(iter: I) -> Self {
        Self::from_records(iter)
    }
}

impl<'a> IntoIterator for &'a UserTable {
    type Item = &'a UserRecord;
    type IntoIter = std::slice::Iter<'a, UserRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
