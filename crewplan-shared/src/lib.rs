//! # Crewplan Shared Library
//!
//! Shared types and business logic used by the Crewplan API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, projects, tasks, comments)
//! - `auth`: JWT issuance/verification and password hashing
//! - `validation`: Per-field request validation with aggregated errors
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;
pub mod validation;

/// Current version of the Crewplan shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
