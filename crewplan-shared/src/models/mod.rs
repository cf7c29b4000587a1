/// Database models
///
/// One module per table:
///
/// - `user`: user accounts and roles
/// - `project`: projects owned by project managers
/// - `task`: tasks with status lifecycle and assignment
/// - `comment`: append-only task comments

pub mod comment;
pub mod project;
pub mod task;
pub mod user;
