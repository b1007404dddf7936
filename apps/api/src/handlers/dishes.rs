use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;
use dishpicker_domain::{DishId, Principal, UserId};

use crate::dto::{
    CreateDishRequest, DishResponse, ListDishesQuery, RandomDishesQuery, UpdateDishRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_dishes_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListDishesQuery>,
) -> ApiResult<Json<Vec<DishResponse>>> {
    let dishes = state
        .dish_service
        .list_dishes(principal, query.user_id.map(UserId::new))
        .await?
        .into_iter()
        .map(DishResponse::from)
        .collect();

    Ok(Json(dishes))
}

pub async fn create_dish_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<CreateDishRequest>,
) -> ApiResult<(StatusCode, Json<DishResponse>)> {
    let dish = state
        .dish_service
        .create_dish(principal, payload.into())
        .await?;

    Ok((StatusCode::CREATED, Json(DishResponse::from(dish))))
}

pub async fn random_dishes_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<RandomDishesQuery>,
) -> ApiResult<Json<Vec<DishResponse>>> {
    let query = query.into_query()?;
    let dishes = state
        .dish_service
        .random_dishes(principal, &query)
        .await?
        .into_iter()
        .map(DishResponse::from)
        .collect();

    Ok(Json(dishes))
}

pub async fn get_dish_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(dish_id): Path<i64>,
) -> ApiResult<Json<DishResponse>> {
    let dish = state
        .dish_service
        .get_dish(principal, DishId::new(dish_id))
        .await?;

    Ok(Json(DishResponse::from(dish)))
}

pub async fn update_dish_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(dish_id): Path<i64>,
    Json(payload): Json<UpdateDishRequest>,
) -> ApiResult<Json<DishResponse>> {
    let dish = state
        .dish_service
        .update_dish(principal, DishId::new(dish_id), payload.into())
        .await?;

    Ok(Json(DishResponse::from(dish)))
}

pub async fn delete_dish_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(dish_id): Path<i64>,
) -> ApiResult<StatusCode> {
    state
        .dish_service
        .delete_dish(principal, DishId::new(dish_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
