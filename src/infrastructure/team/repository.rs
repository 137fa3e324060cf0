//! In-memory team repository implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::team::{Team, TeamId, TeamRepository};
use crate::domain::user::UserId;
use crate::domain::DomainError;

/// Team map plus unique indexes, all behind one lock
#[derive(Debug, Default)]
struct Store {
    teams: HashMap<TeamId, Team>,
    by_name: HashMap<String, TeamId>,
    by_leader: HashMap<UserId, TeamId>,
}

/// In-memory implementation of TeamRepository
#[derive(Debug, Default)]
pub struct InMemoryTeamRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemoryTeamRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TeamRepository for InMemoryTeamRepository {
    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError> {
        let store = self.store.read().await;
        Ok(store.teams.get(&id).cloned())
    }

    async fn find_by_leader(&self, leader: UserId) -> Result<Option<Team>, DomainError> {
        let store = self.store.read().await;

        Ok(store
            .by_leader
            .get(&leader)
            .and_then(|id| store.teams.get(id))
            .cloned())
    }

    async fn find_by_member(&self, user: UserId) -> Result<Option<Team>, DomainError> {
        let store = self.store.read().await;

        Ok(store
            .teams
            .values()
            .find(|team| team.has_member(user))
            .cloned())
    }

    async fn find_by_user(&self, user: UserId) -> Result<Option<Team>, DomainError> {
        let store = self.store.read().await;

        Ok(store
            .teams
            .values()
            .find(|team| team.involves(user))
            .cloned())
    }

    async fn find_by_user_excluding(
        &self,
        user: UserId,
        exclude: TeamId,
    ) -> Result<Option<Team>, DomainError> {
        let store = self.store.read().await;

        Ok(store
            .teams
            .values()
            .find(|team| team.id() != exclude && team.involves(user))
            .cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Team>, DomainError> {
        let store = self.store.read().await;

        Ok(store
            .by_name
            .get(name)
            .and_then(|id| store.teams.get(id))
            .cloned())
    }

    async fn name_exists_excluding(
        &self,
        name: &str,
        exclude: Option<TeamId>,
    ) -> Result<bool, DomainError> {
        let store = self.store.read().await;

        Ok(store
            .by_name
            .get(name)
            .is_some_and(|id| Some(*id) != exclude))
    }

    async fn create(&self, team: Team) -> Result<Team, DomainError> {
        let mut store = self.store.write().await;

        if store.by_name.contains_key(team.team_name()) {
            return Err(DomainError::conflict(
                "Team name already exists. Please choose another name.",
            ));
        }

        if store.by_leader.contains_key(&team.leader()) {
            return Err(DomainError::conflict(
                "You already have a team. You cannot create another team.",
            ));
        }

        store.by_name.insert(team.team_name().to_string(), team.id());
        store.by_leader.insert(team.leader(), team.id());
        store.teams.insert(team.id(), team.clone());

        Ok(team)
    }

    async fn update(&self, team: &Team) -> Result<Team, DomainError> {
        let mut store = self.store.write().await;

        let old_team = match store.teams.get(&team.id()) {
            Some(t) => t.clone(),
            None => {
                return Err(DomainError::not_found(format!(
                    "Team '{}' not found",
                    team.id()
                )))
            }
        };

        if old_team.team_name() != team.team_name() {
            if store.by_name.contains_key(team.team_name()) {
                return Err(DomainError::conflict(
                    "Team name already exists. Please choose another name.",
                ));
            }

            store.by_name.remove(old_team.team_name());
            store.by_name.insert(team.team_name().to_string(), team.id());
        }

        store.teams.insert(team.id(), team.clone());

        Ok(team.clone())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let store = self.store.read().await;
        Ok(store.teams.len())
    }
}
