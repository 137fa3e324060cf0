//! Domain layer: entities, validation, and repository traits

pub mod error;
pub mod login_history;
pub mod team;
pub mod user;

pub use error::DomainError;
