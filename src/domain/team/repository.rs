//! Team repository trait

use async_trait::async_trait;
use std::fmt::Debug;

use super::entity::{Team, TeamId};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Repository trait for team storage
#[async_trait]
pub trait TeamRepository: Send + Sync + Debug {
    /// Get a team by its ID
    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError>;

    /// Find the team led by the given user, if any
    async fn find_by_leader(&self, leader: UserId) -> Result<Option<Team>, DomainError>;

    /// Find a team whose roster contains the given user (leader excluded)
    async fn find_by_member(&self, user: UserId) -> Result<Option<Team>, DomainError>;

    /// Find any team the given user is involved in, as leader or member
    async fn find_by_user(&self, user: UserId) -> Result<Option<Team>, DomainError>;

    /// Like `find_by_user` but ignoring one team, used when re-checking a
    /// roster during an edit
    async fn find_by_user_excluding(
        &self,
        user: UserId,
        exclude: TeamId,
    ) -> Result<Option<Team>, DomainError>;

    /// Find a team by its exact name
    async fn find_by_name(&self, name: &str) -> Result<Option<Team>, DomainError>;

    /// Whether a team name is taken, optionally ignoring one team
    async fn name_exists_excluding(
        &self,
        name: &str,
        exclude: Option<TeamId>,
    ) -> Result<bool, DomainError>;

    /// Create a new team; fails with a conflict if the name or leader collides
    async fn create(&self, team: Team) -> Result<Team, DomainError>;

    /// Update an existing team
    async fn update(&self, team: &Team) -> Result<Team, DomainError>;

    /// Count teams
    async fn count(&self) -> Result<usize, DomainError>;
}
