//! PostgreSQL connection pooling and schema migrations

use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::domain::DomainError;

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/student_registry".to_string(),
            max_connections: 10,
            connect_timeout_secs: 30,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// Open a connection pool against the configured database
pub async fn connect(config: &PostgresConfig) -> Result<PgPool, DomainError> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
        .connect(&config.url)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to connect to database: {}", e)))
}

/// A single schema migration
struct Migration {
    version: i64,
    description: &'static str,
    up: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create users table",
        up: r#"
            CREATE TABLE IF NOT EXISTS users (
                id UUID PRIMARY KEY,
                name TEXT NOT NULL,
                family TEXT NOT NULL,
                birthdate DATE NOT NULL,
                national_code TEXT NOT NULL,
                mobile TEXT NOT NULL,
                email TEXT NOT NULL,
                university_name TEXT NOT NULL,
                student_number TEXT NOT NULL,
                field_of_study TEXT NOT NULL,
                educational_level TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS users_national_code_idx ON users (national_code);
            CREATE UNIQUE INDEX IF NOT EXISTS users_mobile_idx ON users (mobile);
            CREATE UNIQUE INDEX IF NOT EXISTS users_email_idx ON users (email);
            CREATE UNIQUE INDEX IF NOT EXISTS users_student_number_idx ON users (student_number)
        "#,
    },
    Migration {
        version: 2,
        description: "create teams table",
        up: r#"
            CREATE TABLE IF NOT EXISTS teams (
                id UUID PRIMARY KEY,
                team_name TEXT NOT NULL,
                leader UUID NOT NULL REFERENCES users (id),
                leader_national_code TEXT NOT NULL,
                members JSONB NOT NULL DEFAULT '[]'::jsonb,
                max_members INTEGER NOT NULL DEFAULT 10,
                is_active BOOLEAN NOT NULL DEFAULT TRUE,
                created_at TIMESTAMPTZ NOT NULL,
                updated_at TIMESTAMPTZ NOT NULL
            );
            CREATE UNIQUE INDEX IF NOT EXISTS teams_team_name_idx ON teams (team_name);
            CREATE UNIQUE INDEX IF NOT EXISTS teams_leader_idx ON teams (leader);
            CREATE INDEX IF NOT EXISTS teams_members_idx ON teams USING GIN (members)
        "#,
    },
    Migration {
        version: 3,
        description: "create login_history table",
        up: r#"
            CREATE TABLE IF NOT EXISTS login_history (
                id UUID PRIMARY KEY,
                user_id UUID REFERENCES users (id),
                national_code TEXT NOT NULL,
                ip_address TEXT NOT NULL,
                user_agent TEXT,
                status TEXT NOT NULL,
                login_time TIMESTAMPTZ NOT NULL
            );
            CREATE INDEX IF NOT EXISTS login_history_user_idx ON login_history (user_id);
            CREATE INDEX IF NOT EXISTS login_history_national_code_idx
                ON login_history (national_code)
        "#,
    },
];

async fn ensure_migrations_table(pool: &PgPool) -> Result<(), DomainError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS _migrations (
            version BIGINT PRIMARY KEY,
            description TEXT NOT NULL,
            installed_on TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DomainError::storage(format!("Failed to create migrations table: {}", e)))?;

    Ok(())
}

/// Apply all pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), DomainError> {
    ensure_migrations_table(pool).await?;

    for migration in MIGRATIONS {
        let applied: bool =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM _migrations WHERE version = $1)")
                .bind(migration.version)
                .fetch_one(pool)
                .await
                .map_err(|e| {
                    DomainError::storage(format!("Failed to check migration status: {}", e))
                })?;

        if applied {
            continue;
        }

        tracing::info!(
            version = migration.version,
            "Applying migration: {}",
            migration.description
        );

        for statement in migration.up.split(';') {
            let statement = statement.trim();

            if statement.is_empty() {
                continue;
            }

            sqlx::query(statement).execute(pool).await.map_err(|e| {
                DomainError::storage(format!(
                    "Failed to run migration {}: {}",
                    migration.version, e
                ))
            })?;
        }

        sqlx::query("INSERT INTO _migrations (version, description) VALUES ($1, $2)")
            .bind(migration.version)
            .bind(migration.description)
            .execute(pool)
            .await
            .map_err(|e| {
                DomainError::storage(format!(
                    "Failed to record migration {}: {}",
                    migration.version, e
                ))
            })?;
    }

    Ok(())
}
