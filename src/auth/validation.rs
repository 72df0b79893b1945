use lazy_static::lazy_static;
use regex::Regex;

use crate::ClientError;

pub const MIN_PASSWORD_LEN: usize = 8;

lazy_static! {
    static ref EMAIL: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub fn validate_email(email: &str) -> Result<(), ClientError> {
    if EMAIL.is_match(email.trim()) {
        Ok(())
    } else {
        Err(ClientError::ValidationError(
            "Enter a valid email address.".to_string(),
        ))
    }
}

/// Minimum accepted by the login form
pub fn validate_password_length(password: &str) -> Result<(), ClientError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ClientError::ValidationError(format!(
            "Password must be at least {} characters long.",
            MIN_PASSWORD_LEN
        )))
    }
}

/// Rule for new accounts: long enough, with lower- and uppercase letters,
/// a digit and a symbol
pub fn validate_strong_password(password: &str) -> Result<(), ClientError> {
    validate_password_length(password)?;

    let has_lower = password.chars().any(char::is_lowercase);
    let has_upper = password.chars().any(char::is_uppercase);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password
        .chars()
        .any(|c| !c.is_alphanumeric() && c != '_' && !c.is_whitespace());

    if has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        Err(ClientError::ValidationError(
            "Password must include uppercase, lowercase, number, and special character."
                .to_string(),
        ))
    }
}
