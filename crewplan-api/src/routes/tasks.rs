/// Task lifecycle endpoints
///
/// # Endpoints
///
/// - `POST /api/projects/:projectId/tasks` - Create a task (manager, 201)
/// - `PUT /api/tasks/:taskId/assign` - Assign a task to a team member (manager, 200)
/// - `GET /api/tasks/me` - List own assigned tasks (team member, 200)
/// - `PUT /api/tasks/:taskId/status` - Progress task status (assignee, 200)
/// - `POST /api/tasks/:taskId/comments` - Comment on a task (assignee or owner, 201)
///
/// Checks run in a fixed precedence per operation: role, input shape,
/// existence, ownership, business rule, persist.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use crewplan_shared::{
    models::{
        comment::{Comment, CreateComment},
        project::Project,
        task::{AssignedTask, CreateTask, Task, TaskStatus, TaskWithAssignee},
        user::{Role, User},
    },
    validation::{self, FieldErrors},
};
use serde::{Deserialize, Serialize};

use crate::middleware::auth::CurrentUser;

/// Create task request
///
/// `description` stays a raw JSON value so a non-string lands in the field
/// errors map instead of failing body deserialization.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<serde_json::Value>,
}

/// Assign task request
#[derive(Debug, Deserialize)]
pub struct AssignTaskRequest {
    pub assignee_id: Option<i64>,
}

/// Assign task response
#[derive(Debug, Serialize)]
pub struct AssignTaskResponse {
    pub message: String,
    pub task: TaskWithAssignee,
    pub notification: String,
}

/// List my tasks response
#[derive(Debug, Serialize)]
pub struct MyTasksResponse {
    pub tasks: Vec<AssignedTask>,
}

/// Update status request
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: Option<String>,
}

/// Update status response
#[derive(Debug, Serialize)]
pub struct UpdateStatusResponse {
    pub message: String,
    pub task: UpdatedStatusTask,
}

/// The slice of the task returned after a status change
#[derive(Debug, Serialize)]
pub struct UpdatedStatusTask {
    pub id: i64,
    pub title: String,
    pub status: TaskStatus,
    pub updated_at: DateTime<Utc>,
}

/// Add comment request
#[derive(Debug, Deserialize)]
pub struct AddCommentRequest {
    pub content: Option<String>,
}

/// Create a task under one of the calling manager's projects
///
/// The task starts at `todo` with no assignee.
///
/// # Errors
///
/// - `403`: caller is not a project manager / does not own the project
/// - `400`: invalid project ID or validation failure
/// - `404`: project does not exist
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(project_id): Path<i64>,
    Json(req): Json<CreateTaskRequest>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    match user.role {
        Role::ProjectManager => {}
        Role::TeamMember => {
            return Err(ApiError::forbidden("Only Project Managers can create tasks"))
        }
    }

    if project_id <= 0 {
        return Err(ApiError::bad_request("Invalid project ID"));
    }

    let mut errors = FieldErrors::new();
    let title = errors.capture("title", validation::title(req.title.as_deref(), "Task"));
    let description = errors.capture(
        "description",
        validation::description(req.description.as_ref()),
    );

    let (Some(title), Some(description)) = (title, description) else {
        return Err(ApiError::Validation(errors));
    };

    let project = Project::find_by_id(&state.db, project_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Project not found"))?;

    if project.owner_id != user.id {
        return Err(ApiError::forbidden(
            "You can only add tasks to your own projects",
        ));
    }

    let task = Task::create(
        &state.db,
        CreateTask {
            title,
            description,
            project_id,
        },
    )
    .await?;

    tracing::info!(task_id = task.id, project_id, "Task created");

    Ok((StatusCode::CREATED, Json(task)))
}

/// Assign a task to a team member
///
/// Re-assigning the same person is rejected explicitly rather than treated
/// as a silent no-op, so a manager learns the assignment already happened.
///
/// # Errors
///
/// - `403`: caller is not a project manager / does not own the task's project
/// - `400`: bad IDs, self-assignment, already assigned, assignee not a team member
/// - `404`: task or assignee does not exist
pub async fn assign_task(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(task_id): Path<i64>,
    Json(req): Json<AssignTaskRequest>,
) -> ApiResult<Json<AssignTaskResponse>> {
    match user.role {
        Role::ProjectManager => {}
        Role::TeamMember => {
            return Err(ApiError::forbidden("Only Project Managers can assign tasks"))
        }
    }

    if task_id <= 0 {
        return Err(ApiError::bad_request("Invalid task ID"));
    }

    let assignee_id = req
        .assignee_id
        .ok_or_else(|| ApiError::bad_request("Assignee ID is required"))?;

    if assignee_id <= 0 {
        return Err(ApiError::bad_request("Assignee ID must be a positive integer"));
    }

    if assignee_id == user.id {
        return Err(ApiError::bad_request_with(
            "You cannot assign tasks to yourself",
            "Project Managers cannot be task assignees",
        ));
    }

    let task = Task::find_with_project(&state.db, task_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found_with("Task not found", format!("No task exists with ID {}", task_id))
        })?;

    if task.project_owner_id != user.id {
        return Err(ApiError::forbidden_with(
            "You can only assign tasks in your own projects",
            format!("You do not own project \"{}\"", task.project_title),
        ));
    }

    if task.task.assignee_id == Some(assignee_id) {
        return Err(ApiError::bad_request(
            "Task is already assigned to this team member",
        ));
    }

    let assignee = User::find_by_id(&state.db, assignee_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found_with(
                "Team member not found",
                format!("No user exists with ID {}", assignee_id),
            )
        })?;

    match assignee.role {
        Role::TeamMember => {}
        Role::ProjectManager => {
            return Err(ApiError::bad_request_with(
                "Cannot assign to this user",
                format!(
                    "{} ({}) is a {}, not a team member",
                    assignee.name,
                    assignee.email,
                    assignee.role.as_str()
                ),
            ))
        }
    }

    let updated = Task::assign(&state.db, task_id, assignee_id).await?;

    tracing::info!(task_id, assignee_id, "Task assigned");

    Ok(Json(AssignTaskResponse {
        message: "Task assigned successfully".to_string(),
        task: updated,
        notification: "The team member will see this task in their dashboard".to_string(),
    }))
}

/// List the calling team member's assigned tasks, most recently updated first
///
/// # Errors
///
/// - `403`: caller is not a team member
pub async fn list_my_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
) -> ApiResult<Json<MyTasksResponse>> {
    match user.role {
        Role::TeamMember => {}
        Role::ProjectManager => {
            return Err(ApiError::forbidden(
                "Only Team Members can view assigned tasks",
            ))
        }
    }

    let tasks = Task::list_by_assignee(&state.db, user.id).await?;

    Ok(Json(MyTasksResponse { tasks }))
}

/// Progress a task's status
///
/// Only the current assignee may update; an unassigned task cannot be
/// updated by anyone. The rank check is not-less-than, so repeating the
/// current status succeeds and refreshes `updated_at`.
///
/// # Errors
///
/// - `400`: bad ID, unknown status, or backward transition
/// - `403`: caller is not the current assignee
/// - `404`: task does not exist
pub async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(task_id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<Json<UpdateStatusResponse>> {
    if task_id <= 0 {
        return Err(ApiError::bad_request("Invalid task ID"));
    }

    let status_raw = req
        .status
        .ok_or_else(|| ApiError::bad_request("Status is required"))?;

    let new_status: TaskStatus = status_raw.parse().map_err(|_| {
        ApiError::bad_request_with(
            "Invalid status value",
            "Status must be one of: todo, in_progress, done",
        )
    })?;

    let task = Task::find_with_project(&state.db, task_id)
        .await?
        .ok_or_else(|| {
            ApiError::not_found_with("Task not found", format!("No task exists with ID {}", task_id))
        })?;

    // Unset assignee means nobody may update.
    if task.task.assignee_id != Some(user.id) {
        return Err(ApiError::forbidden_with(
            "You can only update status of your assigned tasks",
            format!(
                "You are not assigned to task '{}' in project '{}'",
                task.task.title, task.project_title
            ),
        ));
    }

    if !task.task.status.can_progress_to(new_status) {
        return Err(ApiError::bad_request_with(
            "Invalid status transition",
            format!(
                "Cannot move task from \"{}\" to \"{}\"",
                task.task.status.as_str(),
                new_status.as_str()
            ),
        ));
    }

    let updated = Task::update_status(&state.db, task_id, new_status).await?;

    tracing::info!(task_id, status = new_status.as_str(), "Task status updated");

    Ok(Json(UpdateStatusResponse {
        message: "Status updated".to_string(),
        task: UpdatedStatusTask {
            id: updated.id,
            title: updated.title,
            status: updated.status,
            updated_at: updated.updated_at,
        },
    }))
}

/// Add a comment to a task
///
/// Allowed for the task's current assignee or the owning project's manager.
///
/// # Errors
///
/// - `400`: bad ID or blank content
/// - `403`: caller is neither assignee nor project owner
/// - `404`: task does not exist
pub async fn add_comment(
    State(state): State<AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(task_id): Path<i64>,
    Json(req): Json<AddCommentRequest>,
) -> ApiResult<(StatusCode, Json<Comment>)> {
    if task_id <= 0 {
        return Err(ApiError::bad_request("Invalid task ID"));
    }

    let content = req
        .content
        .ok_or_else(|| ApiError::bad_request("Comment content is required"))?;

    let content = content.trim().to_string();
    if content.is_empty() {
        return Err(ApiError::bad_request(
            "Comment content cannot be empty or whitespace only",
        ));
    }

    let task = Task::find_with_project(&state.db, task_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    let is_assignee = task.task.assignee_id == Some(user.id);
    let is_project_owner = task.project_owner_id == user.id;

    if !is_assignee && !is_project_owner {
        return Err(ApiError::forbidden_with(
            "You cannot comment on this task",
            "Only the assigned team member or project owner can comment",
        ));
    }

    let comment = Comment::create(
        &state.db,
        CreateComment {
            content,
            task_id,
            author_id: user.id,
        },
    )
    .await?;

    tracing::info!(task_id, comment_id = comment.id, "Comment added");

    Ok((StatusCode::CREATED, Json(comment)))
}
