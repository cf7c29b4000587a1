/// Project model and database operations
///
/// Projects are owned by exactly one project manager. Titles are unique per
/// owner: two managers may both run a "Launch" project, one manager may not
/// own two. There is no update or delete path in scope.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     owner_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     UNIQUE (owner_id, title)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// Project row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID (server-assigned)
    pub id: i64,

    /// Title, trimmed, 1-255 chars
    pub title: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Owning project manager
    pub owner_id: i64,

    /// When the project was created
    pub created_at: DateTime<Utc>,
}

/// Per-status counts of a project's child tasks
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TaskCounts {
    pub todo: i64,
    pub in_progress: i64,
    pub done: i64,
}

/// Project annotated with its task-count summary, for the owner's dashboard
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ProjectSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub project: Project,

    #[sqlx(flatten)]
    pub task_counts: TaskCounts,
}

/// Input for creating a project
#[derive(Debug, Clone)]
pub struct CreateProject {
    /// Trimmed title
    pub title: String,

    /// Trimmed description, if any
    pub description: Option<String>,

    pub owner_id: i64,
}

impl Project {
    /// Creates a new project
    pub async fn create(pool: &PgPool, data: CreateProject) -> Result<Self, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (title, description, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, owner_id, created_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.owner_id)
        .fetch_one(pool)
        .await?;

        Ok(project)
    }

    /// Finds a project by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let project = sqlx::query_as::<_, Project>(
            r#"
            SELECT id, title, description, owner_id, created_at
            FROM projects
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }

    /// Checks whether the owner already has a project with this exact title
    pub async fn title_exists_for_owner(
        pool: &PgPool,
        owner_id: i64,
        title: &str,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM projects WHERE owner_id = $1 AND title = $2")
                .bind(owner_id)
                .bind(title)
                .fetch_optional(pool)
                .await?;

        Ok(row.is_some())
    }

    /// Lists an owner's projects, newest first, each with per-status task counts
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: i64,
    ) -> Result<Vec<ProjectSummary>, sqlx::Error> {
        let projects = sqlx::query_as::<_, ProjectSummary>(
            r#"
            SELECT p.id, p.title, p.description, p.owner_id, p.created_at,
                   COUNT(t.id) FILTER (WHERE t.status = 'todo')        AS todo,
                   COUNT(t.id) FILTER (WHERE t.status = 'in_progress') AS in_progress,
                   COUNT(t.id) FILTER (WHERE t.status = 'done')        AS done
            FROM projects p
            LEFT JOIN tasks t ON t.project_id = p.id
            WHERE p.owner_id = $1
            GROUP BY p.id
            ORDER BY p.created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await?;

        Ok(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_serializes_counts_nested() {
        let summary = ProjectSummary {
            project: Project {
                id: 1,
                title: "Launch".to_string(),
                description: None,
                owner_id: 9,
                created_at: Utc::now(),
            },
            task_counts: TaskCounts {
                todo: 2,
                in_progress: 1,
                done: 0,
            },
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["title"], "Launch");
        assert_eq!(json["task_counts"]["todo"], 2);
        assert_eq!(json["task_counts"]["in_progress"], 1);
        assert_eq!(json["task_counts"]["done"], 0);
    }
}
