//! User profile API endpoints

use axum::{
    extract::State,
    routing::{get, put},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireUser;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::user::User;
use crate::infrastructure::user::UpdateProfileRequest;

/// Create the users router
pub fn create_users_router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/profile", put(update_profile))
}

/// Full profile view, password omitted
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUser {
    pub id: String,
    pub name: String,
    pub family: String,
    pub birthdate: NaiveDate,
    pub national_code: String,
    pub mobile: String,
    pub email: String,
    pub university_name: String,
    pub student_number: String,
    pub field_of_study: String,
    pub educational_level: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProfileUser {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
            family: user.family().to_string(),
            birthdate: user.birthdate(),
            national_code: user.national_code().to_string(),
            mobile: user.mobile().to_string(),
            email: user.email().to_string(),
            university_name: user.university_name().to_string(),
            student_number: user.student_number().to_string(),
            field_of_study: user.field_of_study().to_string(),
            educational_level: user.educational_level().as_str().to_string(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: ProfileUser,
}

/// Get the authenticated user's profile
///
/// GET /api/users/profile
pub async fn get_profile(
    RequireUser(user): RequireUser,
) -> Result<Json<ProfileResponse>, ApiError> {
    Ok(Json(ProfileResponse {
        success: true,
        user: ProfileUser::from_user(&user),
    }))
}

/// Profile update request; absent or blank fields are left unchanged
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileBody {
    pub name: Option<String>,
    pub family: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub university_name: Option<String>,
    pub field_of_study: Option<String>,
    pub educational_level: Option<String>,
    pub mobile: Option<String>,
    pub email: Option<String>,
    pub student_number: Option<String>,
    pub password: Option<String>,
    pub current_password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileResponse {
    pub success: bool,
    pub message: String,
    pub user: ProfileUser,
}

/// Update the authenticated user's profile
///
/// PUT /api/users/profile
///
/// The response message names the fields that actually changed.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Json(body): Json<UpdateProfileBody>,
) -> Result<Json<UpdateProfileResponse>, ApiError> {
    let (updated, fields) = state
        .user_service
        .update_profile(
            user.id(),
            UpdateProfileRequest {
                name: body.name,
                family: body.family,
                birthdate: body.birthdate,
                university_name: body.university_name,
                field_of_study: body.field_of_study,
                educational_level: body.educational_level,
                mobile: body.mobile,
                email: body.email,
                student_number: body.student_number,
                password: body.password,
                current_password: body.current_password,
            },
        )
        .await?;

    Ok(Json(UpdateProfileResponse {
        success: true,
        message: format!("Profile updated successfully ({})", fields.join(", ")),
        user: ProfileUser::from_user(&updated),
    }))
}
