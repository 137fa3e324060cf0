//! PostgreSQL login history repository implementation

use async_trait::async_trait;
use serde_json::json;
use sqlx::{PgPool, Row};

use crate::domain::login_history::{LoginHistoryRepository, LoginRecord};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// PostgreSQL implementation of LoginHistoryRepository
#[derive(Debug, Clone)]
pub struct PostgresLoginHistoryRepository {
    pool: PgPool,
}

impl PostgresLoginHistoryRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoginHistoryRepository for PostgresLoginHistoryRepository {
    async fn record(&self, record: LoginRecord) -> Result<LoginRecord, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO login_history (id, user_id, national_code, ip_address, user_agent,
                                       status, login_time)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id())
        .bind(record.user().map(|u| *u.as_uuid()))
        .bind(record.national_code())
        .bind(record.ip_address())
        .bind(record.user_agent())
        .bind(record.status().as_str())
        .bind(record.login_time())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to record login attempt: {}", e)))?;

        Ok(record)
    }

    async fn list_by_user(&self, user: UserId) -> Result<Vec<LoginRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, national_code, ip_address, user_agent, status, login_time
            FROM login_history
            WHERE user_id = $1
            ORDER BY login_time DESC
            "#,
        )
        .bind(user.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list login history: {}", e)))?;

        rows.iter().map(row_to_record).collect()
    }

    async fn list_by_national_code(
        &self,
        national_code: &str,
    ) -> Result<Vec<LoginRecord>, DomainError> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, national_code, ip_address, user_agent, status, login_time
            FROM login_history
            WHERE national_code = $1
            ORDER BY login_time DESC
            "#,
        )
        .bind(national_code)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to list login history: {}", e)))?;

        rows.iter().map(row_to_record).collect()
    }
}

fn row_to_record(row: &sqlx::postgres::PgRow) -> Result<LoginRecord, DomainError> {
    let id: uuid::Uuid = row.get("id");
    let user_id: Option<uuid::Uuid> = row.get("user_id");
    let login_time: chrono::DateTime<chrono::Utc> = row.get("login_time");

    let record_json = json!({
        "id": id,
        "user": user_id,
        "national_code": row.get::<String, _>("national_code"),
        "ip_address": row.get::<String, _>("ip_address"),
        "user_agent": row.get::<Option<String>, _>("user_agent"),
        "status": row.get::<String, _>("status"),
        "login_time": login_time,
    });

    serde_json::from_value(record_json)
        .map_err(|e| DomainError::storage(format!("Failed to deserialize login record: {}", e)))
}
