use std::time::Duration;

use dishpicker_core::AppError;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

static MIGRATOR: Migrator = sqlx::migrate!("../../crates/infrastructure/migrations");

const MAX_CONNECTIONS: u32 = 10;

pub async fn connect_and_migrate(database_url: &str) -> Result<PgPool, AppError> {
    let pool = PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    MIGRATOR
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    info!(
        migrations = MIGRATOR.iter().count(),
        max_connections = MAX_CONNECTIONS,
        "database ready"
    );

    Ok(pool)
}
