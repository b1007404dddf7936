use axum::Json;
use axum::extract::State;

use crate::dto::{DishTypeResponse, LabelResponse};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list_labels_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<LabelResponse>>> {
    let labels = state.catalog_service.list_labels().await?;
    Ok(Json(labels.iter().map(LabelResponse::from).collect()))
}

pub async fn list_dish_types_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<DishTypeResponse>>> {
    let dish_types = state.catalog_service.list_dish_types().await?;
    Ok(Json(dish_types.iter().map(DishTypeResponse::from).collect()))
}
