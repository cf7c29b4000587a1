/// Task model and database operations
///
/// Tasks live under exactly one project, start at `todo`, and move through a
/// one-directional status progression. Assignment links a task to at most
/// one team member; reassignment simply overwrites the link.
///
/// # Status progression
///
/// ```text
/// todo < in_progress < done
/// ```
///
/// Transitions must be non-decreasing under this order: `done → todo` is
/// rejected, while repeating the current status is allowed (a retried
/// request gets a stable 200 rather than a surprising 400).
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done');
///
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     title VARCHAR(255) NOT NULL,
///     description TEXT,
///     status task_status NOT NULL DEFAULT 'todo',
///     project_id BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     assignee_id BIGINT REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::str::FromStr;

/// Task status with a total order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    /// Status as its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }

    /// Rank in the total order: todo(1) < in_progress(2) < done(3)
    pub fn rank(&self) -> u8 {
        match self {
            TaskStatus::Todo => 1,
            TaskStatus::InProgress => 2,
            TaskStatus::Done => 3,
        }
    }

    /// Whether moving from `self` to `target` respects the one-way
    /// progression. The check is not-less-than, so a same-status update
    /// passes.
    pub fn can_progress_to(&self, target: TaskStatus) -> bool {
        target.rank() >= self.rank()
    }
}

impl FromStr for TaskStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            _ => Err(()),
        }
    }
}

/// Task row
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (server-assigned)
    pub id: i64,

    /// Title, trimmed, 1-255 chars
    pub title: String,

    /// Optional free-text description
    pub description: Option<String>,

    /// Current lifecycle status
    pub status: TaskStatus,

    /// Parent project (immutable)
    pub project_id: i64,

    /// Current assignee, if any (always a team member)
    pub assignee_id: Option<i64>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated (assignment or status change)
    pub updated_at: DateTime<Utc>,
}

/// Task joined with its parent project's owner and title
///
/// Used by every per-task operation that needs an ownership or assignee
/// check without a second query.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskWithProject {
    #[sqlx(flatten)]
    pub task: Task,

    /// Owner of the parent project
    pub project_owner_id: i64,

    /// Title of the parent project
    pub project_title: String,
}

/// Task joined with assignee display data, returned after assignment
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TaskWithAssignee {
    pub id: i64,
    pub title: String,
    pub status: TaskStatus,
    pub assignee_id: Option<i64>,
    pub assignee_name: Option<String>,
    pub project_id: i64,
}

/// A team member's view of an assigned task, joined with its project title
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct AssignedTask {
    pub id: i64,
    pub title: String,
    pub status: TaskStatus,
    pub project_title: String,
}

/// Input for creating a task
#[derive(Debug, Clone)]
pub struct CreateTask {
    /// Trimmed title
    pub title: String,

    /// Trimmed description, if any
    pub description: Option<String>,

    pub project_id: i64,
}

impl Task {
    /// Creates a task under a project with status `todo` and no assignee
    pub async fn create(pool: &PgPool, data: CreateTask) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (title, description, status, project_id)
            VALUES ($1, $2, 'todo', $3)
            RETURNING id, title, description, status, project_id, assignee_id,
                      created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.description)
        .bind(data.project_id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Finds a task joined with its parent project's owner and title
    pub async fn find_with_project(
        pool: &PgPool,
        id: i64,
    ) -> Result<Option<TaskWithProject>, sqlx::Error> {
        let task = sqlx::query_as::<_, TaskWithProject>(
            r#"
            SELECT t.id, t.title, t.description, t.status, t.project_id,
                   t.assignee_id, t.created_at, t.updated_at,
                   p.owner_id AS project_owner_id,
                   p.title    AS project_title
            FROM tasks t
            JOIN projects p ON t.project_id = p.id
            WHERE t.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(task)
    }

    /// Sets the assignee and refreshes the updated timestamp
    ///
    /// Returns the task joined with the assignee's display data.
    pub async fn assign(
        pool: &PgPool,
        id: i64,
        assignee_id: i64,
    ) -> Result<TaskWithAssignee, sqlx::Error> {
        sqlx::query("UPDATE tasks SET assignee_id = $1, updated_at = NOW() WHERE id = $2")
            .bind(assignee_id)
            .bind(id)
            .execute(pool)
            .await?;

        let task = sqlx::query_as::<_, TaskWithAssignee>(
            r#"
            SELECT t.id, t.title, t.status, t.assignee_id,
                   u.name AS assignee_name, t.project_id
            FROM tasks t
            LEFT JOIN users u ON t.assignee_id = u.id
            WHERE t.id = $1
            "#,
        )
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Sets the status and refreshes the updated timestamp
    ///
    /// The monotonic-progression check happens in the handler against the
    /// freshly read current status; this is the write half.
    pub async fn update_status(
        pool: &PgPool,
        id: i64,
        status: TaskStatus,
    ) -> Result<Self, sqlx::Error> {
        let task = sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, title, description, status, project_id, assignee_id,
                      created_at, updated_at
            "#,
        )
        .bind(status)
        .bind(id)
        .fetch_one(pool)
        .await?;

        Ok(task)
    }

    /// Lists a team member's assigned tasks, most recently updated first
    pub async fn list_by_assignee(
        pool: &PgPool,
        assignee_id: i64,
    ) -> Result<Vec<AssignedTask>, sqlx::Error> {
        let tasks = sqlx::query_as::<_, AssignedTask>(
            r#"
            SELECT t.id, t.title, t.status, p.title AS project_title
            FROM tasks t
            JOIN projects p ON t.project_id = p.id
            WHERE t.assignee_id = $1
            ORDER BY t.updated_at DESC
            "#,
        )
        .bind(assignee_id)
        .fetch_all(pool)
        .await?;

        Ok(tasks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_rank_order() {
        assert!(TaskStatus::Todo.rank() < TaskStatus::InProgress.rank());
        assert!(TaskStatus::InProgress.rank() < TaskStatus::Done.rank());
    }

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(TaskStatus::Todo.can_progress_to(TaskStatus::InProgress));
        assert!(TaskStatus::Todo.can_progress_to(TaskStatus::Done));
        assert!(TaskStatus::InProgress.can_progress_to(TaskStatus::Done));
    }

    #[test]
    fn test_backward_transitions_rejected() {
        assert!(!TaskStatus::Done.can_progress_to(TaskStatus::Todo));
        assert!(!TaskStatus::Done.can_progress_to(TaskStatus::InProgress));
        assert!(!TaskStatus::InProgress.can_progress_to(TaskStatus::Todo));
    }

    #[test]
    fn test_same_status_transition_allowed() {
        // Not-less-than, not strictly-greater: a repeat is accepted.
        assert!(TaskStatus::Todo.can_progress_to(TaskStatus::Todo));
        assert!(TaskStatus::InProgress.can_progress_to(TaskStatus::InProgress));
        assert!(TaskStatus::Done.can_progress_to(TaskStatus::Done));
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done] {
            assert_eq!(status.as_str().parse::<TaskStatus>(), Ok(status));
        }
        assert!("archived".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_status_serde_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            r#""in_progress""#
        );
        let status: TaskStatus = serde_json::from_str(r#""done""#).unwrap();
        assert_eq!(status, TaskStatus::Done);
    }
}
