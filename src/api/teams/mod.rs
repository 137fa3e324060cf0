//! Team API endpoints
//!
//! Teams are created and edited by their leader; any member can view
//! the team they belong to.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::team::{Team, TeamMember};
use crate::domain::user::User;
use crate::infrastructure::team::{CreateTeamRequest, EditTeamRequest};

/// Create the teams router
pub fn create_teams_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_team))
        .route("/edit", put(edit_team))
        .route("/my-team", get(my_team))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamLeader {
    pub id: String,
    pub name: String,
    pub family: String,
    pub national_code: String,
}

impl TeamLeader {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
            family: user.family().to_string(),
            national_code: user.national_code().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberView {
    pub national_code: String,
    pub name: String,
    pub family: String,
    pub joined_at: DateTime<Utc>,
}

impl TeamMemberView {
    fn from_member(member: &TeamMember) -> Self {
        Self {
            national_code: member.national_code.clone(),
            name: member.name.clone(),
            family: member.family.clone(),
            joined_at: member.joined_at,
        }
    }
}

fn member_views(team: &Team) -> Vec<TeamMemberView> {
    team.members().iter().map(TeamMemberView::from_member).collect()
}

/// Team creation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeamBody {
    pub team_name: String,
    pub member_national_codes: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedTeam {
    pub id: String,
    pub team_name: String,
    pub leader: TeamLeader,
    pub members: Vec<TeamMemberView>,
    pub total_members: usize,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CreateTeamResponse {
    pub success: bool,
    pub message: String,
    pub team: CreatedTeam,
}

/// Create a team led by the authenticated user
///
/// POST /api/teams/create
pub async fn create_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<CreateTeamBody>,
) -> Result<(StatusCode, Json<CreateTeamResponse>), ApiError> {
    let team = state
        .team_service
        .create_team(
            user.id(),
            CreateTeamRequest {
                team_name: body.team_name,
                member_national_codes: body.member_national_codes,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateTeamResponse {
            success: true,
            message: "Team created successfully".to_string(),
            team: CreatedTeam {
                id: team.id().to_string(),
                team_name: team.team_name().to_string(),
                leader: TeamLeader::from_user(&user),
                members: member_views(&team),
                total_members: team.total_size(),
                created_at: team.created_at(),
            },
        }),
    ))
}

/// Team edit request; only the provided fields are changed
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditTeamBody {
    pub team_name: Option<String>,
    pub member_national_codes: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditedTeam {
    pub id: String,
    pub team_name: String,
    pub leader: TeamLeader,
    pub members: Vec<TeamMemberView>,
    pub total_members: usize,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct EditTeamResponse {
    pub success: bool,
    pub message: String,
    pub team: EditedTeam,
}

/// Edit the authenticated leader's team
///
/// PUT /api/teams/edit
///
/// The response message names what changed, e.g.
/// "Team team name and members updated successfully".
pub async fn edit_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<EditTeamBody>,
) -> Result<Json<EditTeamResponse>, ApiError> {
    let (team, labels) = state
        .team_service
        .edit_team(
            user.id(),
            EditTeamRequest {
                team_name: body.team_name,
                member_national_codes: body.member_national_codes,
            },
        )
        .await?;

    Ok(Json(EditTeamResponse {
        success: true,
        message: format!("Team {} updated successfully", labels.join(" and ")),
        team: EditedTeam {
            id: team.id().to_string(),
            team_name: team.team_name().to_string(),
            leader: TeamLeader::from_user(&user),
            members: member_views(&team),
            total_members: team.total_size(),
            updated_at: team.updated_at(),
        },
    }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyTeam {
    pub id: String,
    pub team_name: String,
    pub is_leader: bool,
    pub leader: TeamLeader,
    pub members: Vec<TeamMemberView>,
    pub total_members: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct MyTeamResponse {
    pub success: bool,
    pub team: MyTeam,
}

/// Get the team the authenticated user leads or belongs to
///
/// GET /api/teams/my-team
pub async fn my_team(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<MyTeamResponse>, ApiError> {
    let membership = state
        .team_service
        .my_team(user.id())
        .await?
        .ok_or_else(|| ApiError::not_found("You are not in any team"))?;

    let team = membership.team;
    let leader = if membership.is_leader {
        TeamLeader::from_user(&user)
    } else {
        let leader_user = state
            .user_service
            .get(team.leader())
            .await?
            .ok_or_else(|| ApiError::not_found("Leader not found"))?;
        TeamLeader::from_user(&leader_user)
    };

    Ok(Json(MyTeamResponse {
        success: true,
        team: MyTeam {
            id: team.id().to_string(),
            team_name: team.team_name().to_string(),
            is_leader: membership.is_leader,
            leader,
            members: member_views(&team),
            total_members: team.total_size(),
            created_at: team.created_at(),
            updated_at: team.updated_at(),
        },
    }))
}
