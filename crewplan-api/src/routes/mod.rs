/// API route handlers
///
/// Organized by resource:
///
/// - `health`: health check endpoint
/// - `auth`: registration and login
/// - `projects`: project creation and listing
/// - `tasks`: task lifecycle (create, assign, status, comments)
/// - `users`: team-member directory

pub mod auth;
pub mod health;
pub mod projects;
pub mod tasks;
pub mod users;
