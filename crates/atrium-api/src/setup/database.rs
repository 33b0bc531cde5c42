//! Database setup and initialization

use anyhow::{Context, Result};
use atrium_core::Config;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::path::Path;
use std::time::Duration;

/// Setup database connection pool and run migrations
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let base = &config.base;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(base.db_max_connections)
        .acquire_timeout(Duration::from_secs(base.db_timeout_seconds))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect(&base.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!(
        max_connections = base.db_max_connections,
        "Database connected successfully"
    );

    if !base.run_migrations {
        tracing::info!("Skipping database migrations (RUN_MIGRATIONS=false)");
        return Ok(pool);
    }

    // Run pending migrations on startup (path: workspace migrations/ from crate root)
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = sqlx::migrate::Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
