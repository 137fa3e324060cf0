//! Field validation for user registration and profile edits

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Errors that can occur during user field validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("{0} is required")]
    RequiredField(&'static str),

    #[error("National code must be exactly 10 digits")]
    InvalidNationalCode,

    #[error("Mobile must be exactly 11 digits")]
    InvalidMobile,

    #[error("Please enter a valid email")]
    InvalidEmail,

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Educational level must be one of Associate, Bachelor, Master, PhD")]
    InvalidEducationalLevel,
}

pub const NATIONAL_CODE_LENGTH: usize = 10;
pub const MOBILE_LENGTH: usize = 11;
pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email regex is valid"));

/// Validate a required free-text field (non-blank after trim)
pub fn validate_required(label: &'static str, value: &str) -> Result<(), UserValidationError> {
    if value.trim().is_empty() {
        return Err(UserValidationError::RequiredField(label));
    }

    Ok(())
}

/// Validate a national code: exactly 10 ASCII digits
pub fn validate_national_code(code: &str) -> Result<(), UserValidationError> {
    if code.len() != NATIONAL_CODE_LENGTH || !code.chars().all(|c| c.is_ascii_digit()) {
        return Err(UserValidationError::InvalidNationalCode);
    }

    Ok(())
}

/// Validate a mobile number: exactly 11 ASCII digits
pub fn validate_mobile(mobile: &str) -> Result<(), UserValidationError> {
    if mobile.len() != MOBILE_LENGTH || !mobile.chars().all(|c| c.is_ascii_digit()) {
        return Err(UserValidationError::InvalidMobile);
    }

    Ok(())
}

/// Validate an email address shape
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if !EMAIL_RE.is_match(email) {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a plaintext password before hashing
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.trim().len() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::PasswordTooShort(MIN_PASSWORD_LENGTH));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_field() {
        assert!(validate_required("Name", "Sara").is_ok());
        assert_eq!(
            validate_required("Name", "   "),
            Err(UserValidationError::RequiredField("Name"))
        );
    }

    #[test]
    fn test_valid_national_code() {
        assert!(validate_national_code("1234567890").is_ok());
    }

    #[test]
    fn test_invalid_national_code() {
        assert_eq!(
            validate_national_code("123456789"),
            Err(UserValidationError::InvalidNationalCode)
        );
        assert_eq!(
            validate_national_code("12345678901"),
            Err(UserValidationError::InvalidNationalCode)
        );
        assert_eq!(
            validate_national_code("12345abc90"),
            Err(UserValidationError::InvalidNationalCode)
        );
    }

    #[test]
    fn test_valid_mobile() {
        assert!(validate_mobile("09120000000").is_ok());
    }

    #[test]
    fn test_invalid_mobile() {
        assert_eq!(
            validate_mobile("0912000000"),
            Err(UserValidationError::InvalidMobile)
        );
        assert_eq!(
            validate_mobile("0912000000a"),
            Err(UserValidationError::InvalidMobile)
        );
    }

    #[test]
    fn test_valid_email() {
        assert!(validate_email("a@a.com").is_ok());
        assert!(validate_email("first.last@example.ac.ir").is_ok());
    }

    #[test]
    fn test_invalid_email() {
        assert_eq!(validate_email("not-an-email"), Err(UserValidationError::InvalidEmail));
        assert_eq!(validate_email("a@b"), Err(UserValidationError::InvalidEmail));
        assert_eq!(validate_email("a b@c.com"), Err(UserValidationError::InvalidEmail));
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password("123456").is_ok());
        assert_eq!(
            validate_password("12345"),
            Err(UserValidationError::PasswordTooShort(6))
        );
        // Trimmed length counts, not padded length
        assert_eq!(
            validate_password("  1234  "),
            Err(UserValidationError::PasswordTooShort(6))
        );
    }
}
