/// Common test utilities for integration tests
///
/// Builds the full router against a real PostgreSQL database and drives it
/// in-process through tower's `Service` interface, no listening socket
/// needed. Tests that use [`TestContext`] require `DATABASE_URL` to point at
/// a disposable database and are marked `#[ignore]` so the default test run
/// passes without one.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use crewplan_api::app::{build_router, AppState};
use crewplan_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig};
use crewplan_shared::auth::jwt::TokenService;
use serde_json::{json, Value};
use sqlx::PgPool;
use std::sync::atomic::{AtomicU64, Ordering};
use tower::Service as _;

static UNIQUE: AtomicU64 = AtomicU64::new(0);

/// Returns a suffix unique across tests and test runs, so registrations
/// never collide with leftover rows in a reused database.
pub fn unique_suffix() -> String {
    let n = UNIQUE.fetch_add(1, Ordering::Relaxed);
    format!("{}-{}-{}", std::process::id(), std::time::UNIX_EPOCH.elapsed().map(|d| d.as_nanos()).unwrap_or(0), n)
}

/// Test context containing the app and its database pool
pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
}

impl TestContext {
    /// Creates a new test context against `DATABASE_URL`
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Config {
            api: ApiConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                cors_origins: vec!["*".to_string()],
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")?,
                max_connections: 5,
            },
            jwt: JwtConfig {
                secret: "integration-test-secret-at-least-32-bytes".to_string(),
                expires_hours: 1,
            },
        };

        let db = PgPool::connect(&config.database.url).await?;

        // Migrations path is relative to the shared crate's Cargo.toml.
        sqlx::migrate!("../crewplan-shared/migrations")
            .run(&db)
            .await?;

        let tokens = TokenService::new(config.jwt.to_token_config());
        let state = AppState::new(db.clone(), config, tokens);
        let app = build_router(state);

        Ok(TestContext { db, app })
    }

    /// Sends a request and returns the status and parsed JSON body
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Registers a user through the API and returns (token, user id)
    pub async fn register_user(&self, role: &str) -> (String, i64) {
        let suffix = unique_suffix();
        let (status, body) = self
            .request(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "email": format!("{}-{}@example.com", role, suffix),
                    "password": "password123",
                    "name": format!("Test {}", role),
                    "role": role,
                })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "registration failed: {}", body);
        let token = body["token"].as_str().unwrap().to_string();
        let id = body["user"]["id"].as_i64().unwrap();
        (token, id)
    }

    /// Creates a project as the given manager and returns its id
    pub async fn create_project(&self, token: &str, title: &str) -> i64 {
        let (status, body) = self
            .request(
                "POST",
                "/api/projects",
                Some(token),
                Some(json!({ "title": title, "description": "test project" })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "project creation failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    /// Creates a task in the given project and returns its id
    pub async fn create_task(&self, token: &str, project_id: i64, title: &str) -> i64 {
        let (status, body) = self
            .request(
                "POST",
                &format!("/api/projects/{}/tasks", project_id),
                Some(token),
                Some(json!({ "title": title })),
            )
            .await;

        assert_eq!(status, StatusCode::CREATED, "task creation failed: {}", body);
        body["id"].as_i64().unwrap()
    }

    /// Assigns a task to a team member, asserting success
    pub async fn assign_task(&self, token: &str, task_id: i64, assignee_id: i64) {
        let (status, body) = self
            .request(
                "PUT",
                &format!("/api/tasks/{}/assign", task_id),
                Some(token),
                Some(json!({ "assignee_id": assignee_id })),
            )
            .await;

        assert_eq!(status, StatusCode::OK, "assignment failed: {}", body);
    }
}
