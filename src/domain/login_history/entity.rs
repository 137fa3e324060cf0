//! Login attempt records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::user::UserId;

/// Outcome of a login attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoginStatus {
    Success,
    Failed,
}

impl LoginStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for LoginStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single recorded login attempt. Failed attempts against unknown national
/// codes carry no user reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRecord {
    id: Uuid,
    user: Option<UserId>,
    national_code: String,
    ip_address: String,
    user_agent: Option<String>,
    status: LoginStatus,
    login_time: DateTime<Utc>,
}

impl LoginRecord {
    pub fn new(
        user: Option<UserId>,
        national_code: impl Into<String>,
        ip_address: impl Into<String>,
        user_agent: Option<String>,
        status: LoginStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user,
            national_code: national_code.into(),
            ip_address: ip_address.into(),
            user_agent,
            status,
            login_time: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn user(&self) -> Option<UserId> {
        self.user
    }

    pub fn national_code(&self) -> &str {
        &self.national_code
    }

    pub fn ip_address(&self) -> &str {
        &self.ip_address
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }

    pub fn status(&self) -> LoginStatus {
        self.status
    }

    pub fn login_time(&self) -> DateTime<Utc> {
        self.login_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_record_without_user() {
        let record = LoginRecord::new(
            None,
            "1234567890",
            "127.0.0.1",
            Some("curl/8.0".to_string()),
            LoginStatus::Failed,
        );

        assert!(record.user().is_none());
        assert_eq!(record.status(), LoginStatus::Failed);
        assert_eq!(record.national_code(), "1234567890");
    }

    #[test]
    fn test_status_wire_form() {
        assert_eq!(LoginStatus::Success.as_str(), "success");
        assert_eq!(LoginStatus::Failed.as_str(), "failed");
        assert_eq!(
            serde_json::to_string(&LoginStatus::Success).unwrap(),
            "\"success\""
        );
    }
}
