//! Cryptographic functions for user system
//!
//! Provides password hashing using Argon2id with a random per-password salt.
//! Hashes are stored as PHC strings, which carry the algorithm parameters and
//! the salt alongside the digest.

use std::sync::LazyLock;

use argon2::{
    Algorithm, Argon2, Params,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;

use super::errors::UserError;
use crate::Result;

/// Hash of a throwaway password, verified against when the email is unknown
/// so that both login failures cost one Argon2 run.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("credstore-timing-equalizer").ok());

/// Hash a password using Argon2id
///
/// # Arguments
/// * `password` - The password to hash
///
/// # Returns
/// The Argon2 hash string (PHC format), including the random salt
pub fn hash_password(password: impl AsRef<str>) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = Argon2::default()
        .hash_password(password.as_ref().as_bytes(), &salt)
        .map_err(|e| UserError::HashingFailed {
            reason: e.to_string(),
        })?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against its hash
///
/// # Arguments
/// * `password` - The password to verify
/// * `password_hash` - The stored password hash (PHC format)
///
/// # Returns
/// Ok(()) if password is correct, `InvalidCredentials` otherwise. A stored
/// value that is not an Argon2 PHC string (empty, legacy, corrupted) never
/// verifies, but still costs one Argon2 run so it answers no faster than a
/// wrong password.
pub fn verify_password(password: impl AsRef<str>, password_hash: impl AsRef<str>) -> Result<()> {
    let parsed_hash = PasswordHash::new(password_hash.as_ref())
        .ok()
        .filter(is_argon2_hash);
    let Some(parsed_hash) = parsed_hash else {
        verify_against_dummy(password);
        return Err(UserError::InvalidCredentials.into());
    };

    Argon2::default()
        .verify_password(password.as_ref().as_bytes(), &parsed_hash)
        .map_err(|_| UserError::InvalidCredentials.into())
}

/// Whether `hash` is one `Argon2` can actually check, rather than reject up front.
fn is_argon2_hash(hash: &PasswordHash<'_>) -> bool {
    hash.hash.is_some()
        && Algorithm::try_from(hash.algorithm).is_ok()
        && Params::try_from(hash).is_ok()
}

/// Burn one verification against the dummy hash.
///
/// Used for unknown emails and unusable stored hashes.
pub(crate) fn verify_against_dummy(password: impl AsRef<str>) {
    #[cfg(test)]
    DUMMY_RUNS.with(|runs| runs.set(runs.get() + 1));

    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(password, hash);
    }
}

/// Build the dummy hash now, so the first unknown-email login is not slower
/// than the rest.
pub(crate) fn prepare_dummy_hash() {
    LazyLock::force(&DUMMY_HASH);
}

#[cfg(test)]
thread_local! {
    static DUMMY_RUNS: std::cell::Cell<usize> = const { std::cell::Cell::new(0) };
}

/// Dummy verifications run on the current thread so far.
#[cfg(test)]
pub(crate) fn dummy_runs() -> usize {
    DUMMY_RUNS.with(|runs| runs.get())
}
