//! Dashboard API endpoint
//!
//! Summary view for the authenticated user: account age and, when they
//! belong to a team, a roster with each member's current profile data.

use axum::{extract::State, routing::get, Router};
use chrono::Utc;
use serde::Serialize;

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};

/// Create the dashboard router
pub fn create_dashboard_router() -> Router<AppState> {
    Router::new().route("/", get(dashboard))
}

#[derive(Debug, Serialize)]
pub struct DashboardUser {
    pub id: String,
    pub name: String,
    pub family: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMember {
    pub id: String,
    pub name: String,
    pub family: String,
    pub university_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardTeam {
    pub team_name: String,
    pub is_leader: bool,
    pub members: Vec<DashboardMember>,
    pub total_members: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub success: bool,
    pub user: DashboardUser,
    pub days_since_registration: i64,
    pub team: Option<DashboardTeam>,
}

/// Get the authenticated user's dashboard
///
/// GET /api/dashboard
///
/// Roster entries reflect each member's profile as it is now, not as it
/// was when they joined.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<DashboardResponse>, ApiError> {
    let days_since_registration = (Utc::now() - user.created_at()).num_days();

    let team = match state.team_service.my_team(user.id()).await? {
        Some(membership) => {
            let mut members = Vec::with_capacity(membership.team.members().len());
            for member in membership.team.members() {
                if let Some(account) = state.user_service.get(member.user).await? {
                    members.push(DashboardMember {
                        id: account.id().to_string(),
                        name: account.name().to_string(),
                        family: account.family().to_string(),
                        university_name: account.university_name().to_string(),
                    });
                }
            }

            Some(DashboardTeam {
                team_name: membership.team.team_name().to_string(),
                is_leader: membership.is_leader,
                total_members: membership.team.total_size(),
                members,
            })
        }
        None => None,
    };

    Ok(Json(DashboardResponse {
        success: true,
        user: DashboardUser {
            id: user.id().to_string(),
            name: user.name().to_string(),
            family: user.family().to_string(),
        },
        days_since_registration,
        team,
    }))
}
