/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - Register a new user (201)
/// - `POST /api/auth/login` - Login and receive a token (200)
///
/// Both validate every field and report all failures together in one
/// `errors` map. Login never distinguishes "unknown email" from "wrong
/// password"; both return the identical 401, preventing user enumeration.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use crewplan_shared::{
    auth::password,
    models::user::{CreateUser, PublicUser, User},
    validation::{self, FieldErrors},
};
use serde::{Deserialize, Serialize};

/// Register request
///
/// Fields are optional so that a missing field lands in the errors map
/// ("Email is required") instead of failing JSON deserialization.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Register response
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub message: String,
    pub user: PublicUser,
    pub token: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login response
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: PublicUser,
}

/// Register a new user
///
/// Validates email shape, name length, password length, and role membership
/// together; normalizes the email (trim + lowercase) before the uniqueness
/// check so case/whitespace variants collide.
///
/// # Errors
///
/// - `400`: validation failed (field map)
/// - `409`: email already registered
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let mut errors = FieldErrors::new();

    let email = errors.capture("email", validation::email(req.email.as_deref()));
    let name = errors.capture("name", validation::name(req.name.as_deref()));
    let password = errors.capture("password", validation::password(req.password.as_deref()));
    let role = errors.capture("role", validation::role(req.role.as_deref()));

    let (Some(email), Some(name), Some(password), Some(role)) = (email, name, password, role)
    else {
        return Err(ApiError::Validation(errors));
    };

    if User::email_exists(&state.db, &email).await? {
        return Err(ApiError::Conflict {
            message: Some("Registration failed".to_string()),
            error: "Email already exists".to_string(),
        });
    }

    let password_hash = password::hash_password(&password)?;

    let user = User::create(
        &state.db,
        CreateUser {
            email,
            password_hash,
            name,
            role,
        },
    )
    .await?;

    let token = state.tokens.issue(user.id, &user.email, user.role)?;

    tracing::info!(user_id = user.id, role = user.role.as_str(), "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
            user: user.into_public(),
            token,
        }),
    ))
}

/// Login
///
/// # Errors
///
/// - `400`: validation failed (field map)
/// - `401`: invalid credentials (uniform for unknown email and wrong password)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let mut errors = FieldErrors::new();

    let email = errors.capture("email", validation::email(req.email.as_deref()));
    let password = errors.capture("password", validation::password(req.password.as_deref()));

    let (Some(email), Some(password)) = (email, password) else {
        return Err(ApiError::Validation(errors));
    };

    let user = User::find_by_email(&state.db, &email)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let valid = password::verify_password(&password, &user.password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state.tokens.issue(user.id, &user.email, user.role)?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(LoginResponse {
        message: "Login successful".to_string(),
        token,
        user: user.into_public(),
    }))
}
