use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::catalog::{DishTypeResponse, LabelResponse};

mod conversions;

/// Owner summary embedded in every dish.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/dish-owner-response.ts"
)]
pub struct DishOwnerResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub username: String,
}

/// API representation of a dish.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/dish-response.ts"
)]
pub struct DishResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub name: String,
    pub image_path: Option<String>,
    pub owner: DishOwnerResponse,
    pub labels: Vec<LabelResponse>,
    pub dish_types: Vec<DishTypeResponse>,
    pub created_at: String,
    pub last_update_at: String,
}

/// Incoming payload for dish creation.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/create-dish-request.ts"
)]
pub struct CreateDishRequest {
    pub name: String,
    #[serde(default)]
    #[ts(type = "Array<number> | null")]
    pub labels: Option<Vec<i64>>,
    #[ts(type = "Array<number>")]
    pub dish_types: Vec<i64>,
    pub image_path: Option<String>,
}

/// Incoming payload for a partial dish update. An empty `labels` list
/// removes every label.
#[derive(Debug, Default, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-dish-request.ts"
)]
pub struct UpdateDishRequest {
    pub name: Option<String>,
    #[ts(type = "Array<number> | null")]
    pub labels: Option<Vec<i64>>,
    #[ts(type = "Array<number> | null")]
    pub dish_types: Option<Vec<i64>>,
    pub image_path: Option<String>,
}

/// Query string of `GET /api/dishes`.
#[derive(Debug, Default, Deserialize)]
pub struct ListDishesQuery {
    pub user_id: Option<i64>,
}

/// Query string of `GET /api/dishes/random`; `labels` is a comma separated
/// id list such as `1,4`.
#[derive(Debug, Deserialize)]
pub struct RandomDishesQuery {
    pub dish_type: i64,
    pub labels: Option<String>,
    pub limit: i64,
}
