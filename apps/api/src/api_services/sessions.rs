use dishpicker_core::AppError;
use sqlx::PgPool;
use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{ExpiredDeletion, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;
use tracing::info;

const SESSION_COOKIE_NAME: &str = "dishpicker.sid";

/// Builds the cookie session layer backed by the `tower_sessions` table.
/// Sessions that expired while the server was down are purged on startup.
pub async fn build_session_layer(
    pool: PgPool,
    cookie_secure: bool,
    idle_minutes: i64,
) -> Result<SessionManagerLayer<PostgresStore>, AppError> {
    let store = PostgresStore::new(pool)
        .with_table_name("tower_sessions")
        .map_err(|error| {
            AppError::Validation(format!("invalid session table name configuration: {error}"))
        })?;

    store.migrate().await.map_err(|error| {
        AppError::Internal(format!("failed to initialize session store: {error}"))
    })?;
    store.delete_expired().await.map_err(|error| {
        AppError::Internal(format!("failed to purge expired sessions: {error}"))
    })?;

    info!(idle_minutes, cookie_secure, "session store ready");

    Ok(SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::minutes(idle_minutes))))
}
