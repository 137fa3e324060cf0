//! Student Registry API
//!
//! Registration, authentication and team management for students:
//! - Account registration with national code identity checks
//! - JWT login with full login history auditing
//! - Teams with a single leader and a capped member roster
//! - Dashboard summarizing the user's account and team

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use tracing::info;

use api::state::AppState;
use infrastructure::auth::{JwtConfig, JwtService};
use infrastructure::login_history::{
    InMemoryLoginHistoryRepository, LoginAuditService, PostgresLoginHistoryRepository,
};
use infrastructure::storage::{self, PostgresConfig};
use infrastructure::team::{InMemoryTeamRepository, PostgresTeamRepository, TeamService};
use infrastructure::user::{
    Argon2Hasher, InMemoryUserRepository, PostgresUserRepository, UserService,
};

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> anyhow::Result<AppState> {
    let jwt_service = Arc::new(JwtService::new(JwtConfig::new(
        config.auth.jwt_secret.clone(),
        config.auth.jwt_expiration_hours,
    )));
    let hasher = Arc::new(Argon2Hasher::new());

    let use_postgres = config.storage.backend.eq_ignore_ascii_case("postgres");
    info!("Storage backend: {}", config.storage.backend);

    if use_postgres {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;

        let pg_config = PostgresConfig {
            url: database_url,
            max_connections: config.storage.max_connections,
            connect_timeout_secs: config.storage.connect_timeout_secs,
        };

        info!("Connecting to PostgreSQL...");
        let pool = storage::connect(&pg_config).await?;
        storage::run_migrations(&pool).await?;
        info!("PostgreSQL connection established");

        let users = Arc::new(PostgresUserRepository::new(pool.clone()));
        let teams = Arc::new(PostgresTeamRepository::new(pool.clone()));
        let logins = Arc::new(PostgresLoginHistoryRepository::new(pool));

        Ok(AppState {
            user_service: Arc::new(UserService::new(users.clone(), hasher)),
            team_service: Arc::new(TeamService::new(teams, users)),
            login_audit: Arc::new(LoginAuditService::new(logins)),
            jwt_service,
        })
    } else {
        let users = Arc::new(InMemoryUserRepository::new());
        let teams = Arc::new(InMemoryTeamRepository::new());
        let logins = Arc::new(InMemoryLoginHistoryRepository::new());

        Ok(AppState {
            user_service: Arc::new(UserService::new(users.clone(), hasher)),
            team_service: Arc::new(TeamService::new(teams, users)),
            login_audit: Arc::new(LoginAuditService::new(logins)),
            jwt_service,
        })
    }
}
