/// Error handling for the API server
///
/// A unified error type mapping the domain taxonomy to HTTP responses.
/// Handlers return `ApiResult<T>`; conversion to status code and wire body
/// happens in one place.
///
/// Wire formats:
/// - validation failures: `{"message": "Validation failed", "errors": {field: msg}}` (400)
/// - everything else: `{"error": ..., "details"?: ...}`, with the register
///   email conflict additionally carrying `"message": "Registration failed"`
/// - internal failures: logged server-side, surfaced as a generic 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crewplan_shared::validation::FieldErrors;
use serde_json::json;
use std::fmt;

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - field-level validation, all failures reported together
    Validation(FieldErrors),

    /// Bad request (400) - malformed input or business-rule violation
    BadRequest {
        error: String,
        details: Option<String>,
    },

    /// Unauthorized (401) - uniform regardless of cause
    Unauthorized(String),

    /// Forbidden (403) - role or ownership mismatch
    Forbidden {
        error: String,
        details: Option<String>,
    },

    /// Not found (404)
    NotFound {
        error: String,
        details: Option<String>,
    },

    /// Conflict (409) - duplicate email or project title
    Conflict {
        message: Option<String>,
        error: String,
    },

    /// Internal server error (500) - never leaks internals to the client
    Internal(String),
}

impl ApiError {
    pub fn bad_request(error: impl Into<String>) -> Self {
        ApiError::BadRequest {
            error: error.into(),
            details: None,
        }
    }

    pub fn bad_request_with(error: impl Into<String>, details: impl Into<String>) -> Self {
        ApiError::BadRequest {
            error: error.into(),
            details: Some(details.into()),
        }
    }

    pub fn forbidden(error: impl Into<String>) -> Self {
        ApiError::Forbidden {
            error: error.into(),
            details: None,
        }
    }

    pub fn forbidden_with(error: impl Into<String>, details: impl Into<String>) -> Self {
        ApiError::Forbidden {
            error: error.into(),
            details: Some(details.into()),
        }
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        ApiError::NotFound {
            error: error.into(),
            details: None,
        }
    }

    pub fn not_found_with(error: impl Into<String>, details: impl Into<String>) -> Self {
        ApiError::NotFound {
            error: error.into(),
            details: Some(details.into()),
        }
    }

    pub fn conflict(error: impl Into<String>) -> Self {
        ApiError::Conflict {
            message: None,
            error: error.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(_) => write!(f, "Validation failed"),
            ApiError::BadRequest { error, .. } => write!(f, "Bad request: {}", error),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden { error, .. } => write!(f, "Forbidden: {}", error),
            ApiError::NotFound { error, .. } => write!(f, "Not found: {}", error),
            ApiError::Conflict { error, .. } => write!(f, "Conflict: {}", error),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(errors) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Validation failed", "errors": errors }),
            ),
            ApiError::BadRequest { error, details } => {
                (StatusCode::BAD_REQUEST, error_body(error, details))
            }
            ApiError::Unauthorized(error) => {
                (StatusCode::UNAUTHORIZED, json!({ "error": error }))
            }
            ApiError::Forbidden { error, details } => {
                (StatusCode::FORBIDDEN, error_body(error, details))
            }
            ApiError::NotFound { error, details } => {
                (StatusCode::NOT_FOUND, error_body(error, details))
            }
            ApiError::Conflict { message, error } => {
                let body = match message {
                    Some(message) => json!({ "message": message, "error": error }),
                    None => json!({ "error": error }),
                };
                (StatusCode::CONFLICT, body)
            }
            ApiError::Internal(msg) => {
                // Log internal errors; the client sees nothing specific.
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

fn error_body(error: String, details: Option<String>) -> serde_json::Value {
    match details {
        Some(details) => json!({ "error": error, "details": details }),
        None => json!({ "error": error }),
    }
}

/// Convert sqlx errors to API errors
///
/// Unique-constraint violations become 409s, backstopping the read-then-act
/// checks in the handlers.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::not_found("Resource not found"),
            sqlx::Error::Database(db_err) => {
                if let Some(constraint) = db_err.constraint() {
                    if constraint.contains("email") {
                        return ApiError::Conflict {
                            message: Some("Registration failed".to_string()),
                            error: "Email already exists".to_string(),
                        };
                    }
                    if constraint.contains("owner_id") {
                        return ApiError::conflict(
                            "You already have a project with this title",
                        );
                    }
                    return ApiError::conflict(format!("Constraint violation: {}", constraint));
                }
                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Convert password errors to API errors
impl From<crewplan_shared::auth::password::PasswordError> for ApiError {
    fn from(err: crewplan_shared::auth::password::PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

/// Convert JWT errors to API errors
///
/// Every token failure collapses into the same 401; clients never learn why.
impl From<crewplan_shared::auth::jwt::JwtError> for ApiError {
    fn from(err: crewplan_shared::auth::jwt::JwtError) -> Self {
        match err {
            crewplan_shared::auth::jwt::JwtError::Invalid => {
                ApiError::Unauthorized("Invalid or expired token".to_string())
            }
            crewplan_shared::auth::jwt::JwtError::CreateError(msg) => {
                ApiError::Internal(format!("Token creation failed: {}", msg))
            }
        }
    }
}
