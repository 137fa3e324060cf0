//! In-memory login history repository implementation

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::login_history::{LoginHistoryRepository, LoginRecord};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// In-memory implementation of LoginHistoryRepository
#[derive(Debug, Default)]
pub struct InMemoryLoginHistoryRepository {
    records: Arc<RwLock<Vec<LoginRecord>>>,
}

impl InMemoryLoginHistoryRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoginHistoryRepository for InMemoryLoginHistoryRepository {
    async fn record(&self, record: LoginRecord) -> Result<LoginRecord, DomainError> {
        let mut records = self.records.write().await;
        records.push(record.clone());
        Ok(record)
    }

    async fn list_by_user(&self, user: UserId) -> Result<Vec<LoginRecord>, DomainError> {
        let records = self.records.read().await;

        let mut result: Vec<LoginRecord> = records
            .iter()
            .filter(|r| r.user() == Some(user))
            .cloned()
            .collect();

        result.sort_by(|a, b| b.login_time().cmp(&a.login_time()));

        Ok(result)
    }

    async fn list_by_national_code(
        &self,
        national_code: &str,
    ) -> Result<Vec<LoginRecord>, DomainError> {
        let records = self.records.read().await;

        let mut result: Vec<LoginRecord> = records
            .iter()
            .filter(|r| r.national_code() == national_code)
            .cloned()
            .collect();

        result.sort_by(|a, b| b.login_time().cmp(&a.login_time()));

        Ok(result)
    }
}
