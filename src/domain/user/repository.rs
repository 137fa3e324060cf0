//! User repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{User, UserId};
use crate::domain::DomainError;

/// Repository trait for user storage
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Get a user by their ID
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by their national code (the login username)
    async fn get_by_national_code(&self, national_code: &str) -> Result<Option<User>, DomainError>;

    /// Get a user by mobile number
    async fn get_by_mobile(&self, mobile: &str) -> Result<Option<User>, DomainError>;

    /// Get a user by email (expects a lowercased value)
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;

    /// Get a user by student number
    async fn get_by_student_number(&self, student_number: &str)
        -> Result<Option<User>, DomainError>;

    /// Resolve several national codes at once; missing codes are simply absent
    /// from the result
    async fn find_by_national_codes(&self, codes: &[String]) -> Result<Vec<User>, DomainError>;

    /// Combined existence check over all identifying fields, used before
    /// registration
    async fn identity_exists(
        &self,
        national_code: &str,
        email: &str,
        mobile: &str,
        student_number: &str,
    ) -> Result<bool, DomainError>;

    /// Create a new user; fails with a conflict if any unique field collides
    async fn create(&self, user: User) -> Result<User, DomainError>;

    /// Update an existing user; unique fields are re-checked excluding the
    /// user itself
    async fn update(&self, user: &User) -> Result<User, DomainError>;

    /// Count registered users
    async fn count(&self) -> Result<usize, DomainError>;
}
