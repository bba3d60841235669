//! Input rules shared by the pages (early feedback) and the development API
//! (authoritative check).

use regex::Regex;
use std::sync::OnceLock;

/// Minimum password length accepted for new passwords.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[must_use]
pub fn valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
        .is_some_and(|re| re.is_match(email))
}

#[must_use]
pub fn valid_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}
