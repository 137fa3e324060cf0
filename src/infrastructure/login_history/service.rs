//! Login audit service

use std::sync::Arc;

use crate::domain::login_history::{LoginHistoryRepository, LoginRecord, LoginStatus};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Records login attempts. Auditing must never break a login, so storage
/// failures are logged and swallowed.
#[derive(Debug)]
pub struct LoginAuditService<R: LoginHistoryRepository> {
    repository: Arc<R>,
}

impl<R: LoginHistoryRepository> LoginAuditService<R> {
    /// Create a new login audit service
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Record a login attempt
    pub async fn record_attempt(
        &self,
        user: Option<UserId>,
        national_code: &str,
        ip_address: &str,
        user_agent: Option<String>,
        status: LoginStatus,
    ) {
        let record = LoginRecord::new(user, national_code, ip_address, user_agent, status);

        if let Err(e) = self.repository.record(record).await {
            tracing::warn!(
                national_code = %national_code,
                status = %status,
                "Failed to record login attempt: {}",
                e
            );
        }
    }

    /// List the attempts recorded for a user, most recent first
    pub async fn history_for_user(&self, user: UserId) -> Result<Vec<LoginRecord>, DomainError> {
        self.repository.list_by_user(user).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::login_history::repository::InMemoryLoginHistoryRepository;

    #[tokio::test]
    async fn test_records_success_and_failure() {
        let repo = Arc::new(InMemoryLoginHistoryRepository::new());
        let service = LoginAuditService::new(repo);
        let user = UserId::new();

        service
            .record_attempt(
                Some(user),
                "1234567890",
                "127.0.0.1",
                Some("curl/8.0".to_string()),
                LoginStatus::Success,
            )
            .await;

        service
            .record_attempt(Some(user), "1234567890", "127.0.0.1", None, LoginStatus::Failed)
            .await;

        let records = service.history_for_user(user).await.unwrap();
        assert_eq!(records.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_attempt_without_account() {
        let repo = Arc::new(InMemoryLoginHistoryRepository::new());
        let service = LoginAuditService::new(repo.clone());

        service
            .record_attempt(None, "9999999999", "10.0.0.1", None, LoginStatus::Failed)
            .await;

        let records = repo.list_by_national_code("9999999999").await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(records[0].user().is_none());
    }
}
