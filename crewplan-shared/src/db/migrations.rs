/// Database migration runner
///
/// Runs schema migrations embedded from the `migrations/` directory at this
/// crate's root via `sqlx::migrate!`. Each migration is a plain SQL file
/// named `{version}_{name}.sql`, applied in order and recorded in the
/// `_sqlx_migrations` table.
///
/// # Example
///
/// ```no_run
/// use crewplan_shared::db::{migrations::run_migrations, pool::{create_pool, DatabaseConfig}};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
///
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::PgPool;
use tracing::info;

/// Runs all pending database migrations
///
/// Migrations already applied are skipped; a failed migration is rolled back
/// and returned as an error.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");

    let migrator = sqlx::migrate!("./migrations");
    migrator.run(pool).await?;

    info!("Database migrations up to date");
    Ok(())
}
