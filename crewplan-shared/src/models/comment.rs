/// Comment model and database operations
///
/// Comments are append-only notes on a task, written by either the task's
/// current assignee or the owning project's manager. No edit or delete path
/// exists.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE comments (
///     id BIGSERIAL PRIMARY KEY,
///     content TEXT NOT NULL,
///     task_id BIGINT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     author_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

/// Comment joined with its author's display name
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
    /// Unique comment ID (server-assigned)
    pub id: i64,

    /// Trimmed, non-empty content
    pub content: String,

    pub author_id: i64,

    /// Author display name, joined for the response
    pub author_name: String,

    pub created_at: DateTime<Utc>,
}

/// Input for creating a comment
#[derive(Debug, Clone)]
pub struct CreateComment {
    /// Trimmed content
    pub content: String,

    pub task_id: i64,

    pub author_id: i64,
}

impl Comment {
    /// Appends a comment and returns it joined with the author's name
    pub async fn create(pool: &PgPool, data: CreateComment) -> Result<Self, sqlx::Error> {
        let inserted: (i64,) = sqlx::query_as(
            r#"
            INSERT INTO comments (content, task_id, author_id)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(data.content)
        .bind(data.task_id)
        .bind(data.author_id)
        .fetch_one(pool)
        .await?;

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            SELECT c.id, c.content, c.author_id, u.name AS author_name, c.created_at
            FROM comments c
            JOIN users u ON c.author_id = u.id
            WHERE c.id = $1
            "#,
        )
        .bind(inserted.0)
        .fetch_one(pool)
        .await?;

        Ok(comment)
    }
}
