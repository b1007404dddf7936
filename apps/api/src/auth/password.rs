use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use dishpicker_application::{AuthOutcome, LOGIN_FAILED_MESSAGE, RegisterParams};
use dishpicker_core::{AppError, UserIdentity};
use tower_sessions::Session;
use tracing::info;

use crate::dto::{LoginRequest, RegisterRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

use super::{SESSION_CREATED_AT_KEY, SESSION_USER_KEY};

/// POST /auth/register - Create a regular account.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .user_service
        .register(RegisterParams {
            username: payload.username,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    info!(user_id = %user.id(), "account registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// POST /auth/login - Authenticate with email and password.
pub async fn login_handler(
    State(state): State<AppState>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<UserResponse>> {
    let outcome = state
        .user_service
        .login(&payload.email, &payload.password)
        .await?;

    let AuthOutcome::Authenticated(user) = outcome else {
        return Err(AppError::Unauthorized(LOGIN_FAILED_MESSAGE.to_owned()).into());
    };

    let identity = UserIdentity::new(
        user.id().as_i64(),
        user.username().as_str(),
        user.email().as_str(),
    );

    // New session id on every privilege change.
    session
        .cycle_id()
        .await
        .map_err(|error| AppError::Internal(format!("failed to cycle session id: {error}")))?;

    session
        .insert(SESSION_USER_KEY, &identity)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session identity: {error}"))
        })?;

    session
        .insert(SESSION_CREATED_AT_KEY, chrono::Utc::now().timestamp())
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to persist session creation time: {error}"))
        })?;

    info!(user_id = %user.id(), "user logged in");
    Ok(Json(UserResponse::from(user)))
}
