/// User directory endpoint
///
/// `GET /api/users` - List team members available for assignment (manager only)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, Extension, Json};
use crewplan_shared::models::user::{DirectoryEntry, Role, User};
use serde::Serialize;

use crate::middleware::auth::CurrentUser;

/// Directory listing response
#[derive(Debug, Serialize)]
pub struct DirectoryResponse {
    pub users: Vec<DirectoryEntry>,
}

/// List all team members, ordered by id
///
/// Managers use this to pick assignees. Other managers are excluded.
///
/// # Errors
///
/// - `403`: caller is not a project manager
pub async fn list_team_members(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<DirectoryResponse>> {
    match user.role {
        Role::ProjectManager => {}
        Role::TeamMember => {
            return Err(ApiError::forbidden(
                "Only Project Managers can view team members",
            ))
        }
    }

    let users = User::list_team_members(&state.db).await?;

    Ok(Json(DirectoryResponse { users }))
}
