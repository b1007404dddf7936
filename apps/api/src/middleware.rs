use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use dishpicker_core::AppError;
use dishpicker_domain::{Principal, UserId};
use tower_sessions::Session;
use tracing::debug;

use crate::auth::read_session_identity;
use crate::error::ApiResult;
use crate::state::AppState;

/// Resolves the session user and exposes the current [`Principal`] and
/// [`dishpicker_domain::User`] as request extensions.
///
/// The user is reloaded on every request so role changes and deletions take
/// effect without waiting for the session to expire.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> ApiResult<Response> {
    let identity = read_session_identity(&session)
        .await?
        .ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))?;

    let Some(user) = state
        .user_service
        .find_by_id(UserId::new(identity.user_id()))
        .await?
    else {
        debug!(user_id = identity.user_id(), "session refers to a deleted user");
        session
            .flush()
            .await
            .map_err(|error| AppError::Internal(format!("failed to flush session: {error}")))?;
        return Err(AppError::Unauthorized("authentication required".to_owned()).into());
    };

    request.extensions_mut().insert(Principal::from(&user));
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub async fn require_same_origin_for_mutations(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if is_state_changing_method(request.method())
        && !is_same_origin(request.headers(), &state.frontend_url)
    {
        return Err(AppError::Unauthorized("origin validation failed".to_owned()).into());
    }

    Ok(next.run(request).await)
}

fn is_same_origin(headers: &HeaderMap, allowed_origin: &str) -> bool {
    if headers.get("sec-fetch-site") == Some(&HeaderValue::from_static("cross-site")) {
        return false;
    }

    let origin = headers
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    let referer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    origin == allowed_origin || referer.starts_with(allowed_origin)
}

fn is_state_changing_method(method: &Method) -> bool {
    matches!(
        *method,
        Method::POST | Method::PUT | Method::PATCH | Method::DELETE
    )
}
