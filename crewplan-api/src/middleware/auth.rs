/// Authorization gate
///
/// Middleware applied to every protected route. It extracts the bearer token
/// from the `Authorization` header, verifies it, and attaches the decoded
/// identity to the request as a [`CurrentUser`] extension. Requests without
/// a valid token are rejected with 401 before reaching business logic.
///
/// The gate performs no role checks. Different endpoints require different
/// roles, so role enforcement is each handler's own responsibility, via
/// exhaustive matching on [`Role`].

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use crewplan_shared::models::user::Role;
use serde::Serialize;

use crate::{app::AppState, error::ApiError};

/// Authenticated identity attached to the request after the gate
///
/// Handlers extract it with `Extension<CurrentUser>`.
#[derive(Debug, Clone, Serialize)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

/// Bearer-token authentication middleware
///
/// Rejects with 401 if the header is absent, not a bearer token, or fails
/// verification for any reason. The reason is never distinguished to the
/// client.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let token = auth_header
        .and_then(|h| h.strip_prefix("Bearer "))
        .ok_or_else(|| {
            ApiError::Unauthorized("No token provided or malformed token".to_string())
        })?;

    let claims = state
        .tokens
        .verify(token)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token".to_string()))?;

    let user = CurrentUser {
        id: claims.sub,
        email: claims.email,
        role: claims.role,
    };
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
