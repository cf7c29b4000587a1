/// User model and database operations
///
/// Users register with one of two roles, fixed at creation: project managers
/// own projects and assign tasks; team members receive assignments. There is
/// no update or delete path for users.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE user_role AS ENUM ('project_manager', 'team_member');
///
/// CREATE TABLE users (
///     id BIGSERIAL PRIMARY KEY,
///     email TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL,
///     name VARCHAR(100) NOT NULL,
///     role user_role NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// Emails are stored normalized (trimmed, lowercased) by the registration
/// path, so the unique constraint collapses case/whitespace variants.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::str::FromStr;

/// User role, a closed set
///
/// Handlers match on this exhaustively, so adding a role forces every
/// authorization check to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Owns projects, creates and assigns tasks
    ProjectManager,

    /// Eligible to be a task assignee; cannot own projects
    TeamMember,
}

impl Role {
    /// Role as its wire/database string
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::ProjectManager => "project_manager",
            Role::TeamMember => "team_member",
        }
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "project_manager" => Ok(Role::ProjectManager),
            "team_member" => Ok(Role::TeamMember),
            _ => Err(()),
        }
    }
}

/// User account row
///
/// Contains the password hash; never serialize this struct into a response.
/// Use [`User::into_public`] for anything client-facing.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user ID (server-assigned)
    pub id: i64,

    /// Email address, normalized lowercase
    pub email: String,

    /// Argon2id password hash (PHC string)
    pub password_hash: String,

    /// Display name (1-100 chars)
    pub name: String,

    /// Role, fixed at registration
    pub role: Role,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Client-safe view of a user, without credential material
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Directory entry for the assignee dropdown: id, name, email only
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DirectoryEntry {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    /// Normalized email
    pub email: String,

    /// Argon2id password hash (not the plaintext password)
    pub password_hash: String,

    /// Trimmed display name
    pub name: String,

    pub role: Role,
}

impl User {
    /// Strips credential material for client responses
    pub fn into_public(self) -> PublicUser {
        PublicUser {
            id: self.id,
            email: self.email,
            name: self.name,
            role: self.role,
            created_at: self.created_at,
        }
    }

    /// Creates a new user
    ///
    /// # Errors
    ///
    /// Returns a database error on connection failure or if the email
    /// violates the unique constraint (callers pre-check, the constraint is
    /// the backstop).
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id, email, password_hash, name, role, created_at
            "#,
        )
        .bind(data.email)
        .bind(data.password_hash)
        .bind(data.name)
        .bind(data.role)
        .fetch_one(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by ID
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Finds a user by normalized email
    ///
    /// Callers must normalize (trim + lowercase) before lookup; storage is
    /// already normalized.
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, email, password_hash, name, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(user)
    }

    /// Checks whether a normalized email is already registered
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, sqlx::Error> {
        let row: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?;

        Ok(row.is_some())
    }

    /// Lists all team members for the assignment directory
    ///
    /// Returns id, name, email only; credential material stays in the store.
    pub async fn list_team_members(pool: &PgPool) -> Result<Vec<DirectoryEntry>, sqlx::Error> {
        let users = sqlx::query_as::<_, DirectoryEntry>(
            r#"
            SELECT id, name, email
            FROM users
            WHERE role = 'team_member'
            ORDER BY id
            "#,
        )
        .fetch_all(pool)
        .await?;

        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trips_through_str() {
        assert_eq!("project_manager".parse::<Role>(), Ok(Role::ProjectManager));
        assert_eq!("team_member".parse::<Role>(), Ok(Role::TeamMember));
        assert_eq!(Role::ProjectManager.as_str(), "project_manager");
        assert_eq!(Role::TeamMember.as_str(), "team_member");
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_wire_format() {
        let json = serde_json::to_string(&Role::ProjectManager).unwrap();
        assert_eq!(json, r#""project_manager""#);

        let role: Role = serde_json::from_str(r#""team_member""#).unwrap();
        assert_eq!(role, Role::TeamMember);
    }

    #[test]
    fn test_public_user_has_no_credentials() {
        let user = User {
            id: 1,
            email: "pm@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            name: "PM".to_string(),
            role: Role::ProjectManager,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(user.into_public()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["email"], "pm@x.com");
    }
}
