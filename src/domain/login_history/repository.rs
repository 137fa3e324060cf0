//! Login history repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::LoginRecord;
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for login attempt storage
#[async_trait]
pub trait LoginHistoryRepository: Send + Sync + Debug {
    /// Persist a login attempt
    async fn record(&self, record: LoginRecord) -> Result<LoginRecord, DomainError>;

    /// List attempts linked to a user, most recent first
    async fn list_by_user(&self, user: UserId) -> Result<Vec<LoginRecord>, DomainError>;

    /// List attempts by the national code given at login, most recent first
    async fn list_by_national_code(
        &self,
        national_code: &str,
    ) -> Result<Vec<LoginRecord>, DomainError>;
}
