//! Shared PostgreSQL fixtures. Tests return early when `DATABASE_URL` is unset.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::Utc;
use sqlx::PgPool;
use sqlx::migrate::Migrator;
use sqlx::postgres::PgPoolOptions;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

static SEQUENCE: AtomicU32 = AtomicU32::new(0);

pub(crate) async fn test_pool() -> Option<PgPool> {
    let Ok(database_url) = std::env::var("DATABASE_URL") else {
        return None;
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .connect(database_url.as_str())
        .await
    {
        Ok(pool) => pool,
        Err(error) => panic!("failed to connect to DATABASE_URL in test: {error}"),
    };

    if let Err(error) = MIGRATOR.run(&pool).await {
        panic!("failed to run migrations for postgres tests: {error}");
    }

    Some(pool)
}

/// Returns a short token that is unique across test runs sharing a database.
pub(crate) fn unique_suffix() -> String {
    let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("{}{sequence}", Utc::now().timestamp_micros() % 1_000_000_000_000)
}

pub(crate) async fn insert_user(pool: &PgPool, role: &str) -> i64 {
    let suffix = unique_suffix();
    let row: Result<(i64,), sqlx::Error> = sqlx::query_as(
        r#"
        INSERT INTO users (username, email, password_hash, role)
        VALUES ($1, $2, 'hash', $3)
        RETURNING id
        "#,
    )
    .bind(format!("user{suffix}"))
    .bind(format!("u{suffix}@test.de"))
    .bind(role)
    .fetch_one(pool)
    .await;

    match row {
        Ok((id,)) => id,
        Err(error) => panic!("failed to insert test user: {error}"),
    }
}

pub(crate) async fn insert_label(pool: &PgPool) -> i64 {
    let row: Result<(i64,), sqlx::Error> =
        sqlx::query_as("INSERT INTO labels (name) VALUES ($1) RETURNING id")
            .bind(format!("Label {}", unique_suffix()))
            .fetch_one(pool)
            .await;

    match row {
        Ok((id,)) => id,
        Err(error) => panic!("failed to insert test label: {error}"),
    }
}

pub(crate) async fn insert_dish_type(pool: &PgPool) -> i64 {
    let row: Result<(i64,), sqlx::Error> =
        sqlx::query_as("INSERT INTO dish_types (name) VALUES ($1) RETURNING id")
            .bind(format!("Type {}", unique_suffix()))
            .fetch_one(pool)
            .await;

    match row {
        Ok((id,)) => id,
        Err(error) => panic!("failed to insert test dish type: {error}"),
    }
}
