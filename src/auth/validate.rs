//! Field validation: the email grammar and the length/presence checks.
//!
//! One email regex serves both purposes it has in the contract: classifying
//! a login credential as email-vs-username, and rejecting usernames that
//! look like email addresses. Keeping a single grammar means the two checks
//! can never drift apart.

use lazy_static::lazy_static;
use regex::Regex;

use super::errors::ValidationError;

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 30;
pub const EMAIL_MIN_LENGTH: usize = 3;
pub const EMAIL_MAX_LENGTH: usize = 255;
pub const PASSWORD_MIN_LENGTH: usize = 6;
pub const PASSWORD_MAX_LENGTH: usize = 255;

lazy_static! {
    // RFC 5322 simplified email regex (practical validation)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).unwrap();
}

/// Whether `value` matches the email grammar
pub fn is_email_shaped(value: &str) -> bool {
    EMAIL_REGEX.is_match(value)
}

/// Validate username presence, length, and shape, appending violations
pub(crate) fn check_username(username: &str, errors: &mut Vec<ValidationError>) {
    if username.is_empty() {
        errors.push(ValidationError::new("username", "can't be blank"));
        return;
    }
    if username.chars().count() < USERNAME_MIN_LENGTH {
        errors.push(ValidationError::new(
            "username",
            format!("is too short (minimum is {USERNAME_MIN_LENGTH} characters)"),
        ));
    }
    if username.chars().count() > USERNAME_MAX_LENGTH {
        errors.push(ValidationError::new(
            "username",
            format!("is too long (maximum is {USERNAME_MAX_LENGTH} characters)"),
        ));
    }
    if is_email_shaped(username) {
        errors.push(ValidationError::new("username", "can't be an email"));
    }
}

/// Validate email presence, length, and shape, appending violations
pub(crate) fn check_email(email: &str, errors: &mut Vec<ValidationError>) {
    if email.is_empty() {
        errors.push(ValidationError::new("email", "can't be blank"));
        return;
    }
    if email.chars().count() < EMAIL_MIN_LENGTH {
        errors.push(ValidationError::new(
            "email",
            format!("is too short (minimum is {EMAIL_MIN_LENGTH} characters)"),
        ));
    }
    if email.chars().count() > EMAIL_MAX_LENGTH {
        errors.push(ValidationError::new(
            "email",
            format!("is too long (maximum is {EMAIL_MAX_LENGTH} characters)"),
        ));
    }
    if !is_email_shaped(email) {
        errors.push(ValidationError::new("email", "is invalid"));
    }
}

/// Validate raw password length, appending violations
pub(crate) fn check_raw_password(raw_password: &str, errors: &mut Vec<ValidationError>) {
    if raw_password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.push(ValidationError::new(
            "password",
            format!("is too short (minimum is {PASSWORD_MIN_LENGTH} characters)"),
        ));
    }
    if raw_password.chars().count() > PASSWORD_MAX_LENGTH {
        errors.push(ValidationError::new(
            "password",
            format!("is too long (maximum is {PASSWORD_MAX_LENGTH} characters)"),
        ));
    }
}

/// Whether a raw password is within the accepted length bounds
pub(crate) fn password_length_ok(raw_password: &str) -> bool {
    let len = raw_password.chars().count();
    (PASSWORD_MIN_LENGTH..=PASSWORD_MAX_LENGTH).contains(&len)
}
