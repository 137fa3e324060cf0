//! API error responses
//!
//! Every failure body carries `success: false` and a `message`; validation
//! failures with more than one problem also carry an `errors` array, and
//! member resolution failures carry `notFoundNationalCodes`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_found_national_codes: Option<Vec<String>>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ApiErrorBody,
}

impl ApiError {
    /// Create a new API error
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ApiErrorBody {
                success: false,
                message: message.into(),
                errors: None,
                not_found_national_codes: None,
            },
        }
    }

    /// Attach per-field validation messages
    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.body.errors = Some(errors);
        self
    }

    /// Attach the national codes that could not be resolved
    pub fn with_not_found_codes(mut self, codes: Vec<String>) -> Self {
        self.body.not_found_national_codes = Some(codes);
        self
    }

    /// Bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Authentication error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    /// Not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { message } => Self::not_found(message),
            DomainError::Validation { errors } => {
                // A single problem reads best as the message itself; several
                // go in the errors array under a generic headline
                if errors.len() == 1 {
                    Self::bad_request(errors.into_iter().next().unwrap_or_default())
                } else {
                    Self::bad_request("Validation error").with_errors(errors)
                }
            }
            DomainError::Conflict { message } => Self::bad_request(message),
            DomainError::Unauthorized { message } => Self::unauthorized(message),
            DomainError::MembersNotFound { codes } => {
                Self::not_found("Some users not found").with_not_found_codes(codes)
            }
            DomainError::Configuration { message } => Self::internal(message),
            DomainError::Storage { message } => Self::internal(message),
            DomainError::Internal { message } => Self::internal(message),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.body.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("Team name is required");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(!err.body.success);
        assert_eq!(err.body.message, "Team name is required");
    }

    #[test]
    fn test_single_validation_error_becomes_message() {
        let domain_err = DomainError::validation("No valid updates provided");
        let api_err: ApiError = domain_err.into();

        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_err.body.message, "No valid updates provided");
        assert!(api_err.body.errors.is_none());
    }

    #[test]
    fn test_multiple_validation_errors_get_array() {
        let domain_err = DomainError::validation_all(vec![
            "Name is required".to_string(),
            "Mobile must be exactly 11 digits".to_string(),
        ]);
        let api_err: ApiError = domain_err.into();

        assert_eq!(api_err.body.message, "Validation error");
        assert_eq!(api_err.body.errors.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_members_not_found_carries_codes() {
        let domain_err = DomainError::members_not_found(vec!["1234567890".to_string()]);
        let api_err: ApiError = domain_err.into();

        assert_eq!(api_err.status, StatusCode::NOT_FOUND);
        assert_eq!(api_err.body.message, "Some users not found");
        assert_eq!(
            api_err.body.not_found_national_codes,
            Some(vec!["1234567890".to_string()])
        );
    }

    #[test]
    fn test_not_found_codes_serialized_camel_case() {
        let err = ApiError::not_found("Some users not found")
            .with_not_found_codes(vec!["1234567890".to_string()]);

        let json = serde_json::to_string(&err.body).unwrap();
        assert!(json.contains("notFoundNationalCodes"));
    }

    #[test]
    fn test_storage_error_maps_to_500() {
        let api_err: ApiError = DomainError::storage("connection refused").into();
        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unauthorized() {
        let api_err: ApiError = DomainError::unauthorized("Invalid credentials").into();
        assert_eq!(api_err.status, StatusCode::UNAUTHORIZED);
    }
}
