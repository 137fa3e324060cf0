use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::auth;
use super::dashboard;
use super::health;
use super::state::AppState;
use super::teams;
use super::types::ApiError;
use super::users;

/// Create the full router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Registration and login (no auth required)
        .nest("/api/auth", auth::create_auth_router())
        // Authenticated endpoints
        .nest("/api/users", users::create_users_router())
        .nest("/api/teams", teams::create_teams_router())
        .nest("/api/dashboard", dashboard::create_dashboard_router())
        .fallback(route_not_found)
        // Add state and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
