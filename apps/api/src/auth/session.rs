use axum::Extension;
use axum::Json;
use axum::http::StatusCode;
use dishpicker_core::{AppError, UserIdentity};
use dishpicker_domain::User;
use tower_sessions::Session;
use tracing::info;

use crate::dto::UserResponse;
use crate::error::ApiResult;

use super::SESSION_USER_KEY;

/// Reads the identity stored at login, if any.
pub async fn read_session_identity(session: &Session) -> Result<Option<UserIdentity>, AppError> {
    session
        .get::<UserIdentity>(SESSION_USER_KEY)
        .await
        .map_err(|error| AppError::Internal(format!("failed to read session identity: {error}")))
}

/// POST /auth/logout - Destroy the current session.
pub async fn logout_handler(session: Session) -> ApiResult<StatusCode> {
    let identity = read_session_identity(&session).await?;

    session
        .delete()
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete session: {error}")))?;

    if let Some(identity) = identity {
        info!(user_id = identity.user_id(), "user logged out");
    }

    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me - Return the authenticated account with its current role.
pub async fn me_handler(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(UserResponse::from(user))
}
