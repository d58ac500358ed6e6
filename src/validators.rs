//! Form validation rules for registration and login. All checks are pure;
//! storage is never touched here.

use crate::error::{Error, Result};
use crate::models::Registration;

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub fn is_empty(value: &str) -> bool {
    value.trim().is_empty()
}

/// Light-weight email shape check: something before a single `@`, no
/// whitespace anywhere, and a dot with characters on both sides in the
/// domain part.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .bytes()
        .enumerate()
        .any(|(i, b)| b == b'.' && i > 0 && i + 1 < domain.len())
}

pub fn passwords_match(password: &str, confirm: &str) -> bool {
    password == confirm
}

pub fn meets_min_length(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

pub fn validate_login(email: &str, password: &str) -> Result<()> {
    if is_empty(email) {
        return Err(Error::validation("Email is required"));
    }
    if !is_valid_email(email) {
        return Err(Error::validation("Enter a valid email address"));
    }
    if is_empty(password) {
        return Err(Error::validation("Password is required"));
    }
    // No length check at login; that only applies when registering.
    Ok(())
}

pub fn validate_registration(registration: &Registration) -> Result<()> {
    if is_empty(&registration.name) {
        return Err(Error::validation("Name is required"));
    }
    if is_empty(&registration.email) {
        return Err(Error::validation("Email is required"));
    }
    if !is_valid_email(&registration.email) {
        return Err(Error::validation("Enter a valid email address"));
    }
    if is_empty(&registration.password) {
        return Err(Error::validation("Password is required"));
    }
    if !meets_min_length(&registration.password) {
        return Err(Error::validation(
            "Password must be at least 6 characters long",
        ));
    }
    if is_empty(&registration.confirm_password) {
        return Err(Error::validation("Confirm your password"));
    }
    if !passwords_match(&registration.password, &registration.confirm_password) {
        return Err(Error::validation("Passwords do not match"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("a@b.c"));
        assert!(is_valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ana@example"));
        assert!(!is_valid_email("ana@.com"));
        assert!(!is_valid_email("ana@example."));
        assert!(!is_valid_email("two@@example.com"));
        assert!(!is_valid_email("spaced name@example.com"));
    }

    #[test]
    fn empty_means_blank_or_whitespace() {
        assert!(is_empty(""));
        assert!(is_empty("   "));
        assert!(!is_empty(" a "));
    }

    #[test]
    fn password_length_boundary() {
        assert!(!meets_min_length("12345"));
        assert!(meets_min_length("123456"));
    }

    fn registration() -> Registration {
        Registration {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
        }
    }

    #[test]
    fn valid_registration_passes() {
        assert!(validate_registration(&registration()).is_ok());
    }

    #[test]
    fn mismatched_passwords_fail() {
        let mut reg = registration();
        reg.confirm_password = "different".to_string();
        let err = validate_registration(&reg).unwrap_err();
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn short_password_fails_registration_but_not_login() {
        let mut reg = registration();
        reg.password = "abc".to_string();
        reg.confirm_password = "abc".to_string();
        assert!(validate_registration(&reg).is_err());

        // Login only requires the field to be present
        assert!(validate_login("ana@example.com", "abc").is_ok());
    }
}
