//! Team domain: entity, validation, and repository trait

mod entity;
mod repository;
mod validation;

pub use entity::{Team, TeamId, TeamMember};
pub use repository::TeamRepository;
pub use validation::{
    validate_max_members, validate_team_name, TeamValidationError, DEFAULT_MAX_MEMBERS,
    MAX_TEAM_NAME_LENGTH, MIN_TEAM_NAME_LENGTH,
};
