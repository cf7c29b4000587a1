/// Project endpoints
///
/// # Endpoints
///
/// - `POST /api/projects` - Create a project (project managers only, 201)
/// - `GET /api/projects` - List own projects with task counts (200)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Extension, Json};
use crewplan_shared::{
    models::{
        project::{CreateProject, Project, ProjectSummary},
        user::Role,
    },
    validation::{self, FieldErrors},
};
use serde::{Deserialize, Serialize};

use crate::middleware::auth::CurrentUser;

/// Create project request
///
/// `description` stays a raw JSON value so a non-string lands in the field
/// errors map instead of failing body deserialization.
#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: Option<String>,
    pub description: Option<serde_json::Value>,
}

/// List projects response
#[derive(Debug, Serialize)]
pub struct ListProjectsResponse {
    pub projects: Vec<ProjectSummary>,
}

/// Create a project owned by the calling manager
///
/// # Errors
///
/// - `403`: caller is not a project manager
/// - `400`: validation failed (field map)
/// - `409`: caller already owns a project with this title
pub async fn create_project(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Json(req): Json<CreateProjectRequest>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    match user.role {
        Role::ProjectManager => {}
        Role::TeamMember => {
            return Err(ApiError::forbidden(
                "Only Project Managers can create projects",
            ))
        }
    }

    let mut errors = FieldErrors::new();
    let title = errors.capture("title", validation::title(req.title.as_deref(), "Project"));
    let description = errors.capture(
        "description",
        validation::description(req.description.as_ref()),
    );

    let (Some(title), Some(description)) = (title, description) else {
        return Err(ApiError::Validation(errors));
    };

    if Project::title_exists_for_owner(&state.db, user.id, &title).await? {
        return Err(ApiError::conflict(
            "You already have a project with this title",
        ));
    }

    let project = Project::create(
        &state.db,
        CreateProject {
            title,
            description,
            owner_id: user.id,
        },
    )
    .await?;

    tracing::info!(project_id = project.id, owner_id = user.id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// List the calling manager's projects, newest first
///
/// Each project carries a `task_counts` summary of child tasks per status.
///
/// # Errors
///
/// - `403`: caller is not a project manager
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<ListProjectsResponse>> {
    match user.role {
        Role::ProjectManager => {}
        Role::TeamMember => {
            return Err(ApiError::forbidden(
                "Only Project Managers can view projects",
            ))
        }
    }

    let projects = Project::list_by_owner(&state.db, user.id).await?;

    Ok(Json(ListProjectsResponse { projects }))
}
