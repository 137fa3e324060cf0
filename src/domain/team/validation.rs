//! Team validation

use thiserror::Error;

/// Errors that can occur during team validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TeamValidationError {
    #[error("Team name cannot be empty")]
    EmptyName,

    #[error("Team name must be at least {0} characters")]
    NameTooShort(usize),

    #[error("Team name must not exceed {0} characters")]
    NameTooLong(usize),

    #[error("Max members must be between {0} and {1}")]
    MaxMembersOutOfRange(usize, usize),

    #[error("Team cannot have more than {0} members")]
    TooManyMembers(usize),
}

pub const MIN_TEAM_NAME_LENGTH: usize = 3;
pub const MAX_TEAM_NAME_LENGTH: usize = 50;
pub const DEFAULT_MAX_MEMBERS: usize = 10;
pub const MIN_MAX_MEMBERS: usize = 1;
pub const MAX_MAX_MEMBERS: usize = 50;

/// Validate a team name (expects a trimmed value)
pub fn validate_team_name(name: &str) -> Result<(), TeamValidationError> {
    if name.is_empty() {
        return Err(TeamValidationError::EmptyName);
    }

    if name.chars().count() < MIN_TEAM_NAME_LENGTH {
        return Err(TeamValidationError::NameTooShort(MIN_TEAM_NAME_LENGTH));
    }

    if name.chars().count() > MAX_TEAM_NAME_LENGTH {
        return Err(TeamValidationError::NameTooLong(MAX_TEAM_NAME_LENGTH));
    }

    Ok(())
}

/// Validate a max-members bound
pub fn validate_max_members(max: usize) -> Result<(), TeamValidationError> {
    if !(MIN_MAX_MEMBERS..=MAX_MAX_MEMBERS).contains(&max) {
        return Err(TeamValidationError::MaxMembersOutOfRange(
            MIN_MAX_MEMBERS,
            MAX_MAX_MEMBERS,
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_team_name() {
        assert!(validate_team_name("Rustaceans").is_ok());
        assert!(validate_team_name("abc").is_ok());
        assert!(validate_team_name(&"a".repeat(50)).is_ok());
    }

    #[test]
    fn test_empty_team_name() {
        assert_eq!(validate_team_name(""), Err(TeamValidationError::EmptyName));
    }

    #[test]
    fn test_team_name_too_short() {
        assert_eq!(
            validate_team_name("ab"),
            Err(TeamValidationError::NameTooShort(3))
        );
    }

    #[test]
    fn test_team_name_too_long() {
        assert_eq!(
            validate_team_name(&"a".repeat(51)),
            Err(TeamValidationError::NameTooLong(50))
        );
    }

    #[test]
    fn test_max_members_bounds() {
        assert!(validate_max_members(1).is_ok());
        assert!(validate_max_members(10).is_ok());
        assert!(validate_max_members(50).is_ok());
        assert!(validate_max_members(0).is_err());
        assert!(validate_max_members(51).is_err());
    }
}
