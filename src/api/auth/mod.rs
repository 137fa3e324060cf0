//! Authentication API endpoints
//!
//! Registration and login. Every login attempt, successful or not, is
//! recorded in the login history.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::post,
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::api::middleware::ClientIp;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::login_history::LoginStatus;
use crate::domain::user::User;
use crate::infrastructure::user::RegisterRequest;

/// Create the authentication router
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
}

/// Registration request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterBody {
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
    pub password: String,
}

/// Registration response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub user: RegisteredUser,
}

/// The slice of the account echoed back after registration
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub id: String,
    pub name: String,
    pub family: String,
    pub national_code: String,
    pub email: String,
}

/// Register a new user
///
/// POST /api/auth/register
///
/// Returns a JWT token so the new account is immediately usable.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let user = state
        .user_service
        .register(RegisterRequest {
            name: body.name,
            family: body.family,
            birthdate: body.birthdate,
            national_code: body.national_code,
            mobile: body.mobile,
            email: body.email,
            university_name: body.university_name,
            student_number: body.student_number,
            field_of_study: body.field_of_study,
            educational_level: body.educational_level,
            password: body.password,
        })
        .await?;

    let token = state
        .jwt_service
        .generate(&user)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            message: "User registered successfully".to_string(),
            token,
            user: RegisteredUser {
                id: user.id().to_string(),
                name: user.name().to_string(),
                family: user.family().to_string(),
                national_code: user.national_code().to_string(),
                email: user.email().to_string(),
            },
        }),
    ))
}

/// Login request; `username` is the national code
#[derive(Debug, Deserialize)]
pub struct LoginBody {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
    pub ip_address: String,
    pub user: LoggedInUser,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedInUser {
    pub id: String,
    pub name: String,
    pub family: String,
    pub national_code: String,
    pub email: String,
    pub university_name: String,
    pub student_number: String,
}

impl LoggedInUser {
    fn from_user(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_string(),
            family: user.family().to_string(),
            national_code: user.national_code().to_string(),
            email: user.email().to_string(),
            university_name: user.university_name().to_string(),
            student_number: user.student_number().to_string(),
        }
    }
}

/// Login with national code and password
///
/// POST /api/auth/login
///
/// Failures always answer "Invalid credentials", whether the account is
/// unknown or the password wrong.
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip_address): ClientIp,
    headers: HeaderMap,
    Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError> {
    let username = body.username.as_deref().unwrap_or("").trim();
    let password = body.password.as_deref().unwrap_or("");

    if username.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request(
            "Please provide username (national code) and password",
        ));
    }

    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string());

    let user = state
        .user_service
        .authenticate(username, password)
        .await?;

    let user = match user {
        Some(user) => user,
        None => {
            // Link the failed attempt to the account when one exists
            let known_user = state
                .user_service
                .get_by_national_code(username)
                .await
                .unwrap_or(None)
                .map(|u| u.id());

            state
                .login_audit
                .record_attempt(
                    known_user,
                    username,
                    &ip_address,
                    user_agent,
                    LoginStatus::Failed,
                )
                .await;

            return Err(ApiError::unauthorized("Invalid credentials"));
        }
    };

    state
        .login_audit
        .record_attempt(
            Some(user.id()),
            username,
            &ip_address,
            user_agent,
            LoginStatus::Success,
        )
        .await;

    let token = state
        .jwt_service
        .generate(&user)
        .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(LoginResponse {
        success: true,
        message: "Login successful".to_string(),
        token,
        ip_address,
        user: LoggedInUser::from_user(&user),
    }))
}
