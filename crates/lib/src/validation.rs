//! Input validation for account operations
//!
//! Stateless predicates used to gate input before the store is touched, plus
//! the email mask applied to every log line that mentions an address.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants::{MASK_CHAR, MIN_PASSWORD_LENGTH};

/// Conservative email grammar: `local@label.tld`.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.+-]+@[A-Za-z0-9-]+\.[A-Za-z0-9.-]+$")
        .expect("email pattern is a valid regex")
});

/// Check whether `email` (after trimming) looks like a deliverable address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

/// Check whether `password` is strong enough for a new account.
///
/// Requires at least [`MIN_PASSWORD_LENGTH`] characters including a lowercase
/// letter, an uppercase letter, a digit, and a symbol (any character that is
/// neither alphanumeric nor whitespace).
pub fn is_strong_password(password: &str) -> bool {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return false;
    }

    let mut has_lower = false;
    let mut has_upper = false;
    let mut has_digit = false;
    let mut has_symbol = false;

    for c in password.chars() {
        if c.is_lowercase() {
            has_lower = true;
        } else if c.is_uppercase() {
            has_upper = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else if !c.is_alphanumeric() && !c.is_whitespace() {
            has_symbol = true;
        }
    }

    has_lower && has_upper && has_digit && has_symbol
}

/// Mask an email for logging.
///
/// Keeps the first character of the local part, the `@` and the domain;
/// every other local-part character becomes [`MASK_CHAR`]. Input without an
/// `@` keeps only its first character.
pub fn mask_email(email: &str) -> String {
    let (local, domain) = match email.find('@') {
        Some(at_pos) => email.split_at(at_pos),
        None => (email, ""),
    };

    let mut masked = String::with_capacity(email.len());
    let mut chars = local.chars();
    if let Some(first) = chars.next() {
        masked.push(first);
    }
    masked.extend(chars.map(|_| MASK_CHAR));
    masked.push_str(domain);
    masked
}
