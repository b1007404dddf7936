use axum::Json;
use axum::extract::{Extension, Path, State};
use axum::http::StatusCode;
use dishpicker_domain::{Principal, UserId};
use tracing::info;

use crate::dto::{SetUserImageRequest, UpdateUserRequest, UserResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_users_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state
        .user_service
        .list_users(principal)
        .await?
        .into_iter()
        .map(UserResponse::from)
        .collect();

    Ok(Json(users))
}

pub async fn get_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_service
        .get_user(principal, UserId::new(user_id))
        .await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn update_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_user(principal, UserId::new(user_id), payload.into())
        .await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn delete_user_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .user_service
        .delete_user(principal, UserId::new(user_id))
        .await?;

    info!(user_id, deleted_by = %principal.id(), "account deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_user_image_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
    Json(payload): Json<SetUserImageRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_service
        .set_user_image(principal, UserId::new(user_id), &payload.path)
        .await?;

    Ok(Json(UserResponse::from(user)))
}

pub async fn delete_user_image_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_service
        .delete_user_image(principal, UserId::new(user_id))
        .await?;

    Ok(Json(UserResponse::from(user)))
}
