//! PostgreSQL user repository implementation

use async_trait::async_trait;
use serde_json::json;
use sqlx::{PgPool, Row};

use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

const USER_COLUMNS: &str = "id, name, family, birthdate, national_code, mobile, email, \
     university_name, student_number, field_of_study, educational_level, \
     password_hash, created_at, updated_at";

/// PostgreSQL implementation of UserRepository
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn get(&self, id: UserId) -> Result<Option<User>, DomainError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    async fn get_by_national_code(&self, national_code: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("national_code", national_code).await
    }

    async fn get_by_mobile(&self, mobile: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("mobile", mobile).await
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("email", email).await
    }

    async fn get_by_student_number(
        &self,
        student_number: &str,
    ) -> Result<Option<User>, DomainError> {
        self.fetch_one_by("student_number", student_number).await
    }

    async fn find_by_national_codes(&self, codes: &[String]) -> Result<Vec<User>, DomainError> {
        let query = format!(
            "SELECT {} FROM users WHERE national_code = ANY($1)",
            USER_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(codes)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find users: {}", e)))?;

        let mut users = Vec::with_capacity(rows.len());

        for row in rows {
            users.push(row_to_user(&row)?);
        }

        Ok(users)
    }

    async fn identity_exists(
        &self,
        national_code: &str,
        email: &str,
        mobile: &str,
        student_number: &str,
    ) -> Result<bool, DomainError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM users
                WHERE national_code = $1 OR email = $2 OR mobile = $3 OR student_number = $4
            )
            "#,
        )
        .bind(national_code)
        .bind(email)
        .bind(mobile)
        .bind(student_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to check user identity: {}", e)))?;

        Ok(exists)
    }

    async fn create(&self, user: User) -> Result<User, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, name, family, birthdate, national_code, mobile, email,
                               university_name, student_number, field_of_study,
                               educational_level, password_hash, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.name())
        .bind(user.family())
        .bind(user.birthdate())
        .bind(user.national_code())
        .bind(user.mobile())
        .bind(user.email())
        .bind(user.university_name())
        .bind(user.student_number())
        .bind(user.field_of_study())
        .bind(user.educational_level().as_str())
        .bind(user.password_hash())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict(
                    "User with this national code, email, mobile, or student number already exists",
                )
            } else {
                DomainError::storage(format!("Failed to create user: {}", e))
            }
        })?;

        Ok(user)
    }

    async fn update(&self, user: &User) -> Result<User, DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $2, family = $3, birthdate = $4, mobile = $5, email = $6,
                university_name = $7, student_number = $8, field_of_study = $9,
                educational_level = $10, password_hash = $11, updated_at = $12
            WHERE id = $1
            "#,
        )
        .bind(user.id().as_uuid())
        .bind(user.name())
        .bind(user.family())
        .bind(user.birthdate())
        .bind(user.mobile())
        .bind(user.email())
        .bind(user.university_name())
        .bind(user.student_number())
        .bind(user.field_of_study())
        .bind(user.educational_level().as_str())
        .bind(user.password_hash())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                if msg.contains("mobile") {
                    DomainError::conflict("Mobile number already registered")
                } else if msg.contains("email") {
                    DomainError::conflict("Email already registered")
                } else if msg.contains("student_number") {
                    DomainError::conflict("Student number already registered")
                } else {
                    DomainError::conflict("User identity field already registered")
                }
            } else {
                DomainError::storage(format!("Failed to update user: {}", e))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "User '{}' not found",
                user.id()
            )));
        }

        Ok(user.clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count users: {}", e)))?;

        Ok(count as usize)
    }
}

fn row_to_user(row: &sqlx::postgres::PgRow) -> Result<User, DomainError> {
    let id: uuid::Uuid = row.get("id");
    let birthdate: chrono::NaiveDate = row.get("birthdate");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    // The entity's fields are private, so state is restored through its
    // serde representation; password_hash is skipped on serialization but
    // accepted on deserialization
    let user_json = json!({
        "id": id,
        "name": row.get::<String, _>("name"),
        "family": row.get::<String, _>("family"),
        "birthdate": birthdate,
        "national_code": row.get::<String, _>("national_code"),
        "mobile": row.get::<String, _>("mobile"),
        "email": row.get::<String, _>("email"),
        "university_name": row.get::<String, _>("university_name"),
        "student_number": row.get::<String, _>("student_number"),
        "field_of_study": row.get::<String, _>("field_of_study"),
        "educational_level": row.get::<String, _>("educational_level"),
        "password_hash": row.get::<String, _>("password_hash"),
        "created_at": created_at,
        "updated_at": updated_at,
    });

    serde_json::from_value(user_json)
        .map_err(|e| DomainError::storage(format!("Failed to deserialize user: {}", e)))
}
