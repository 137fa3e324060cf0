//! User domain: entity, validation, and repository trait

mod entity;
mod repository;
mod validation;

pub use entity::{EducationalLevel, NewUser, User, UserId};
pub use repository::UserRepository;
pub use validation::{
    validate_email, validate_mobile, validate_national_code, validate_password,
    validate_required, UserValidationError, MIN_PASSWORD_LENGTH,
};

#[cfg(test)]
pub(crate) use entity::test_support;
