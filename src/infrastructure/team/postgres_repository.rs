//! PostgreSQL team repository implementation
//!
//! The member roster is stored as a JSONB column; membership lookups expand
//! it with `jsonb_array_elements`.

use async_trait::async_trait;
use serde_json::json;
use sqlx::{PgPool, Row};

use crate::domain::team::{Team, TeamId, TeamRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

const TEAM_COLUMNS: &str =
    "id, team_name, leader, leader_national_code, members, max_members, is_active, \
     created_at, updated_at";

const MEMBER_MATCH: &str =
    "EXISTS (SELECT 1 FROM jsonb_array_elements(members) m WHERE m->>'user' = $1::text)";

/// PostgreSQL implementation of TeamRepository
#[derive(Debug, Clone)]
pub struct PostgresTeamRepository {
    pool: PgPool,
}

impl PostgresTeamRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TeamRepository for PostgresTeamRepository {
    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError> {
        let query = format!("SELECT {} FROM teams WHERE id = $1", TEAM_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get team: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_team(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_leader(&self, leader: UserId) -> Result<Option<Team>, DomainError> {
        let query = format!("SELECT {} FROM teams WHERE leader = $1", TEAM_COLUMNS);

        let row = sqlx::query(&query)
            .bind(leader.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find team by leader: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_team(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_member(&self, user: UserId) -> Result<Option<Team>, DomainError> {
        let query = format!(
            "SELECT {} FROM teams WHERE {}",
            TEAM_COLUMNS, MEMBER_MATCH
        );

        let row = sqlx::query(&query)
            .bind(user.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find team by member: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_team(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_user(&self, user: UserId) -> Result<Option<Team>, DomainError> {
        let query = format!(
            "SELECT {} FROM teams WHERE leader = $2 OR {}",
            TEAM_COLUMNS, MEMBER_MATCH
        );

        let row = sqlx::query(&query)
            .bind(user.to_string())
            .bind(user.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find team by user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_team(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_user_excluding(
        &self,
        user: UserId,
        exclude: TeamId,
    ) -> Result<Option<Team>, DomainError> {
        let query = format!(
            "SELECT {} FROM teams WHERE id != $3 AND (leader = $2 OR {})",
            TEAM_COLUMNS, MEMBER_MATCH
        );

        let row = sqlx::query(&query)
            .bind(user.to_string())
            .bind(user.as_uuid())
            .bind(exclude.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find team by user: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_team(&row)?)),
            None => Ok(None),
        }
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Team>, DomainError> {
        let query = format!("SELECT {} FROM teams WHERE team_name = $1", TEAM_COLUMNS);

        let row = sqlx::query(&query)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to find team by name: {}", e)))?;

        match row {
            Some(row) => Ok(Some(row_to_team(&row)?)),
            None => Ok(None),
        }
    }

    async fn name_exists_excluding(
        &self,
        name: &str,
        exclude: Option<TeamId>,
    ) -> Result<bool, DomainError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM teams WHERE team_name = $1 AND ($2::uuid IS NULL OR id != $2))",
        )
        .bind(name)
        .bind(exclude.map(|id| *id.as_uuid()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::storage(format!("Failed to check team name: {}", e)))?;

        Ok(exists)
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        let members = serde_json::to_value(team.members())
            .map_err(|e| DomainError::storage(format!("Failed to serialize members: {}", e)))?;

        sqlx::query(
            r#"
            INSERT INTO teams (id, team_name, leader, leader_national_code, members,
                               max_members, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(team.id().as_uuid())
        .bind(team.team_name())
        .bind(team.leader().as_uuid())
        .bind(team.leader_national_code())
        .bind(&members)
        .bind(team.max_members() as i32)
        .bind(team.is_active())
        .bind(team.created_at())
        .bind(team.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                if msg.contains("leader") {
                    DomainError::conflict(
                        "You already have a team. You cannot create another team.",
                    )
                } else {
                    DomainError::conflict("Team name already exists. Please choose another name.")
                }
            } else {
                DomainError::storage(format!("Failed to create team: {}", e))
            }
        })?;

        Ok(team)
    }

    async fn update(&self, team: &Team) -> Result<Team, DomainError> {
        let members = serde_json::to_value(team.members())
            .map_err(|e| DomainError::storage(format!("Failed to serialize members: {}", e)))?;

        let result = sqlx::query(
            r#"
            UPDATE teams
            SET team_name = $2, members = $3, max_members = $4, is_active = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(team.id().as_uuid())
        .bind(team.team_name())
        .bind(&members)
        .bind(team.max_members() as i32)
        .bind(team.is_active())
        .bind(team.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();

            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                DomainError::conflict("Team name already exists. Please choose another name.")
            } else {
                DomainError::storage(format!("Failed to update team: {}", e))
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found(format!(
                "Team '{}' not found",
                team.id()
            )));
        }

        Ok(team.clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM teams")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count teams: {}", e)))?;

        Ok(count as usize)
    }
}

fn row_to_team(row: &sqlx::postgres::PgRow) -> Result<Team, DomainError> {
    let id: uuid::Uuid = row.get("id");
    let leader: uuid::Uuid = row.get("leader");
    let members: serde_json::Value = row.get("members");
    let created_at: chrono::DateTime<chrono::Utc> = row.get("created_at");
    let updated_at: chrono::DateTime<chrono::Utc> = row.get("updated_at");

    let team_json = json!({
        "id": id,
        "team_name": row.get::<String, _>("team_name"),
        "leader": leader,
        "leader_national_code": row.get::<String, _>("leader_national_code"),
        "members": members,
        "max_members": row.get::<i32, _>("max_members"),
        "is_active": row.get::<bool, _>("is_active"),
        "created_at": created_at,
        "updated_at": updated_at,
    });

    serde_json::from_value(team_json)
        .map_err(|e| DomainError::storage(format!("Failed to deserialize team: {}", e)))
}
