/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use crewplan_api::{app::AppState, config::Config};
/// use crewplan_shared::auth::jwt::TokenService;
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let tokens = TokenService::new(config.jwt.to_token_config());
/// let state = AppState::new(pool, config, tokens);
/// let app = crewplan_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use crewplan_shared::auth::jwt::TokenService;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,

    /// JWT issue/verify service, keys derived once at startup
    pub tokens: Arc<TokenService>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config, tokens: TokenService) -> Self {
        Self {
            db,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// The router is organized as follows:
/// ```text
/// /
/// ├── /health                              # Health check (public)
/// └── /api/
///     ├── /auth/                           # Authentication (public)
///     │   ├── POST /register
///     │   └── POST /login
///     ├── /projects/                       # Authenticated
///     │   ├── POST /                       # Create project (manager)
///     │   ├── GET  /                       # List own projects (manager)
///     │   └── POST /:projectId/tasks       # Create task (manager)
///     ├── /tasks/                          # Authenticated
///     │   ├── GET  /me                     # Own assigned tasks (team member)
///     │   ├── PUT  /:taskId/assign         # Assign task (manager)
///     │   ├── PUT  /:taskId/status         # Progress status (assignee)
///     │   └── POST /:taskId/comments       # Comment (assignee or owner)
///     └── GET /users                       # Team member directory (manager)
/// ```
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Logging (tower-http TraceLayer)
/// 2. CORS (tower-http CorsLayer)
/// 3. Authentication (per-route-group basis)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    // Health check (public, no auth)
    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Auth routes (public, no auth required)
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    // Everything else requires a valid bearer token
    let protected_routes = Router::new()
        .route("/projects", post(routes::projects::create_project))
        .route("/projects", get(routes::projects::list_projects))
        .route(
            "/projects/:project_id/tasks",
            post(routes::tasks::create_task),
        )
        .route("/tasks/me", get(routes::tasks::list_my_tasks))
        .route("/tasks/:task_id/assign", put(routes::tasks::assign_task))
        .route("/tasks/:task_id/status", put(routes::tasks::update_status))
        .route("/tasks/:task_id/comments", post(routes::tasks::add_comment))
        .route("/users", get(routes::users::list_team_members))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::middleware::auth::require_auth,
        ));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .merge(protected_routes);

    // Configure CORS based on environment
    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
