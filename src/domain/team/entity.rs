//! Team aggregate and membership snapshots

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validation::{
    validate_max_members, validate_team_name, TeamValidationError, DEFAULT_MAX_MEMBERS,
};
use crate::domain::user::{User, UserId};

/// Team identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(Uuid);

impl TeamId {
    /// Generate a fresh random identifier
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TeamId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Member roster entry: a snapshot of the user's identity copied at join
/// time, not live-joined
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMember {
    pub user: UserId,
    pub national_code: String,
    pub name: String,
    pub family: String,
    pub joined_at: DateTime<Utc>,
}

impl TeamMember {
    /// Snapshot a user as a roster entry with a fresh join timestamp
    pub fn from_user(user: &User) -> Self {
        Self {
            user: user.id(),
            national_code: user.national_code().to_string(),
            name: user.name().to_string(),
            family: user.family().to_string(),
            joined_at: Utc::now(),
        }
    }
}

/// Team entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier
    id: TeamId,
    /// Display name; globally unique, 3-50 chars after trim
    team_name: String,
    /// The user who created the team; exactly one per team, immutable
    leader: UserId,
    leader_national_code: String,
    /// Ordered roster, leader excluded
    members: Vec<TeamMember>,
    max_members: usize,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Team {
    /// Create a new team led by `leader` with an initial roster
    pub fn new(
        team_name: impl Into<String>,
        leader: &User,
        members: Vec<TeamMember>,
    ) -> Result<Self, TeamValidationError> {
        let team_name = team_name.into().trim().to_string();
        validate_team_name(&team_name)?;

        if members.len() > DEFAULT_MAX_MEMBERS {
            return Err(TeamValidationError::TooManyMembers(DEFAULT_MAX_MEMBERS));
        }

        let now = Utc::now();

        Ok(Self {
            id: TeamId::new(),
            team_name,
            leader: leader.id(),
            leader_national_code: leader.national_code().to_string(),
            members,
            max_members: DEFAULT_MAX_MEMBERS,
            is_active: true,
            created_at: now,
            updated_at: now,
        })
    }

    // Getters

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn team_name(&self) -> &str {
        &self.team_name
    }

    pub fn leader(&self) -> UserId {
        self.leader
    }

    pub fn leader_national_code(&self) -> &str {
        &self.leader_national_code
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn max_members(&self) -> usize {
        self.max_members
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Total team size: leader counted implicitly, never stored in the roster
    pub fn total_size(&self) -> usize {
        self.members.len() + 1
    }

    /// Whether the given user appears in the roster (leader excluded)
    pub fn has_member(&self, user_id: UserId) -> bool {
        self.members.iter().any(|m| m.user == user_id)
    }

    /// Whether the given user is the leader or appears in the roster
    pub fn involves(&self, user_id: UserId) -> bool {
        self.leader == user_id || self.has_member(user_id)
    }

    // Mutators

    /// Rename the team (expects a trimmed value)
    pub fn set_team_name(&mut self, name: impl Into<String>) -> Result<(), TeamValidationError> {
        let name = name.into();
        validate_team_name(&name)?;
        self.team_name = name;
        self.touch();
        Ok(())
    }

    /// Override the max-members bound (1-50)
    pub fn set_max_members(&mut self, max: usize) -> Result<(), TeamValidationError> {
        validate_max_members(max)?;
        self.max_members = max;
        self.touch();
        Ok(())
    }

    /// Wholesale roster replacement; every entry keeps whatever `joined_at`
    /// it carries
    pub fn replace_members(
        &mut self,
        members: Vec<TeamMember>,
    ) -> Result<(), TeamValidationError> {
        if members.len() > self.max_members {
            return Err(TeamValidationError::TooManyMembers(self.max_members));
        }

        self.members = members;
        self.touch();
        Ok(())
    }

    /// Remove every member, leaving only the leader
    pub fn clear_members(&mut self) {
        self.members.clear();
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
