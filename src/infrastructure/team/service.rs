//! Team service: creation, editing, and membership lookups
//!
//! Creation and editing are serialized through a single mutex so the
//! check-then-write sequences (name uniqueness, one-team-per-user) cannot
//! interleave. The storage layer's unique indexes back this up for the
//! Postgres case, where other processes may write concurrently.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::team::{Team, TeamMember, TeamRepository};
use crate::domain::user::{User, UserId, UserRepository};
use crate::domain::DomainError;

/// Request for creating a team
#[derive(Debug, Clone)]
pub struct CreateTeamRequest {
    pub team_name: String,
    pub member_national_codes: Option<Vec<String>>,
}

/// Request for editing a team. Absent fields are left untouched; an empty
/// member list removes every member.
#[derive(Debug, Clone, Default)]
pub struct EditTeamRequest {
    pub team_name: Option<String>,
    pub member_national_codes: Option<Vec<String>>,
}

/// A team together with the role the requesting user plays in it
#[derive(Debug, Clone)]
pub struct TeamMembership {
    pub team: Team,
    pub is_leader: bool,
}

/// Team service
#[derive(Debug)]
pub struct TeamService<T: TeamRepository, U: UserRepository> {
    teams: Arc<T>,
    users: Arc<U>,
    write_lock: Mutex<()>,
}

impl<T: TeamRepository, U: UserRepository> TeamService<T, U> {
    /// Create a new team service
    pub fn new(teams: Arc<T>, users: Arc<U>) -> Self {
        Self {
            teams,
            users,
            write_lock: Mutex::new(()),
        }
    }

    /// Create a team led by the given user
    pub async fn create_team(
        &self,
        leader_id: UserId,
        request: CreateTeamRequest,
    ) -> Result<Team, DomainError> {
        if request.team_name.trim().is_empty() {
            return Err(DomainError::validation("Team name is required"));
        }

        let _guard = self.write_lock.lock().await;

        if self.teams.find_by_leader(leader_id).await?.is_some() {
            return Err(DomainError::conflict(
                "You already have a team. You cannot create another team.",
            ));
        }

        if self.teams.find_by_member(leader_id).await?.is_some() {
            return Err(DomainError::conflict(
                "You are already a member of another team. You cannot create a new team.",
            ));
        }

        if self
            .teams
            .name_exists_excluding(request.team_name.trim(), None)
            .await?
        {
            return Err(DomainError::conflict(
                "Team name already exists. Please choose another name.",
            ));
        }

        let leader = self
            .users
            .get(leader_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Leader not found"))?;

        let mut members = Vec::new();

        if let Some(codes) = &request.member_national_codes {
            if !codes.is_empty() {
                let users = self.resolve_members(codes, &leader).await?;

                for user in &users {
                    if let Some(occupied) = self.teams.find_by_user(user.id()).await? {
                        return Err(DomainError::conflict(format!(
                            "User with national code {} is already in team \"{}\"",
                            user.national_code(),
                            occupied.team_name()
                        )));
                    }
                }

                members = users.iter().map(TeamMember::from_user).collect();
            }
        }

        let team = Team::new(request.team_name, &leader, members)
            .map_err(|e| DomainError::validation(e.to_string()))?;

        self.teams.create(team).await
    }

    /// Edit the team led by the given user, returning the updated team and
    /// the labels of what changed
    pub async fn edit_team(
        &self,
        leader_id: UserId,
        request: EditTeamRequest,
    ) -> Result<(Team, Vec<&'static str>), DomainError> {
        let _guard = self.write_lock.lock().await;

        let mut team = self
            .teams
            .find_by_leader(leader_id)
            .await?
            .ok_or_else(|| {
                DomainError::not_found("You do not have a team. Only team leaders can edit team.")
            })?;

        let mut updated = Vec::new();

        if let Some(name) = &request.team_name {
            let name = name.trim();

            if name.is_empty() {
                return Err(DomainError::validation("Team name cannot be empty"));
            }

            if name != team.team_name() {
                if self
                    .teams
                    .name_exists_excluding(name, Some(team.id()))
                    .await?
                {
                    return Err(DomainError::conflict(
                        "Team name already exists. Please choose another name.",
                    ));
                }

                team.set_team_name(name)
                    .map_err(|e| DomainError::validation(e.to_string()))?;
                updated.push("team name");
            }
        }

        if let Some(codes) = &request.member_national_codes {
            let leader = self
                .users
                .get(leader_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Leader not found"))?;

            if codes.is_empty() {
                team.clear_members();
                updated.push("members");
            } else {
                let users = self.resolve_members(codes, &leader).await?;

                for user in &users {
                    let occupied = self
                        .teams
                        .find_by_user_excluding(user.id(), team.id())
                        .await?;

                    if let Some(occupied) = occupied {
                        return Err(DomainError::conflict(format!(
                            "User with national code {} is already in team \"{}\"",
                            user.national_code(),
                            occupied.team_name()
                        )));
                    }
                }

                if users.len() > team.max_members() {
                    return Err(DomainError::validation(format!(
                        "Team cannot have more than {} members",
                        team.max_members()
                    )));
                }

                // Full replacement: every entry gets a fresh join timestamp,
                // even members that were already on the roster
                let roster = users.iter().map(TeamMember::from_user).collect();
                team.replace_members(roster)
                    .map_err(|e| DomainError::validation(e.to_string()))?;
                updated.push("members");
            }
        }

        if updated.is_empty() {
            return Err(DomainError::validation(
                "No updates provided. Please provide teamName or memberNationalCodes to update.",
            ));
        }

        let team = self.teams.update(&team).await?;

        Ok((team, updated))
    }

    /// Find the team the given user belongs to, as leader or member
    pub async fn my_team(&self, user_id: UserId) -> Result<Option<TeamMembership>, DomainError> {
        let team = match self.teams.find_by_user(user_id).await? {
            Some(t) => t,
            None => return Ok(None),
        };

        let is_leader = team.leader() == user_id;

        Ok(Some(TeamMembership { team, is_leader }))
    }

    /// Count teams
    pub async fn count(&self) -> Result<usize, DomainError> {
        self.teams.count().await
    }

    /// Resolve the requested national codes to users, deduplicating while
    /// keeping first-seen order and rejecting the leader's own code
    async fn resolve_members(
        &self,
        codes: &[String],
        leader: &User,
    ) -> Result<Vec<User>, DomainError> {
        let mut unique: Vec<String> = Vec::with_capacity(codes.len());

        for code in codes {
            if !unique.contains(code) {
                unique.push(code.clone());
            }
        }

        if unique.iter().any(|c| c == leader.national_code()) {
            return Err(DomainError::validation(
                "Leader cannot be added as a member",
            ));
        }

        let found = self.users.find_by_national_codes(&unique).await?;

        if found.len() != unique.len() {
            let missing: Vec<String> = unique
                .iter()
                .filter(|code| !found.iter().any(|u| u.national_code() == code.as_str()))
                .cloned()
                .collect();

            return Err(DomainError::members_not_found(missing));
        }

        // Keep the order the codes were given in
        let mut users = Vec::with_capacity(unique.len());

        for code in &unique {
            if let Some(user) = found.iter().find(|u| u.national_code() == code.as_str()) {
                users.push(user.clone());
            }
        }

        Ok(users)
    }
}
