//! # CrewPlan API Server
//!
//! REST API for small-team project coordination: project managers create
//! projects and tasks, assign tasks to team members, and team members
//! progress task status and discuss work in comments.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p crewplan-api
//! ```

use crewplan_api::{
    app::{build_router, AppState},
    config::Config,
};
use crewplan_shared::{
    auth::jwt::TokenService,
    db::{
        migrations::run_migrations,
        pool::{create_pool, DatabaseConfig},
    },
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crewplan_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "CrewPlan API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let tokens = TokenService::new(config.jwt.to_token_config());

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config, tokens);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
