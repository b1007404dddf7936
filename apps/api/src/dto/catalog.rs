use dishpicker_domain::{DishType, Label};
use serde::Serialize;
use ts_rs::TS;

/// API representation of a dietary label.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/label-response.ts"
)]
pub struct LabelResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub name: String,
}

/// API representation of a meal category.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/dish-type-response.ts"
)]
pub struct DishTypeResponse {
    #[ts(type = "number")]
    pub id: i64,
    pub name: String,
}

impl From<&Label> for LabelResponse {
    fn from(label: &Label) -> Self {
        Self {
            id: label.id().as_i64(),
            name: label.name().to_owned(),
        }
    }
}

impl From<&DishType> for DishTypeResponse {
    fn from(dish_type: &DishType) -> Self {
        Self {
            id: dish_type.id().as_i64(),
            name: dish_type.name().to_owned(),
        }
    }
}
