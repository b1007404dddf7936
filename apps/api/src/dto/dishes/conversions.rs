use dishpicker_application::{CreateDishParams, UpdateDishParams};
use dishpicker_core::{AppError, AppResult};
use dishpicker_domain::{Dish, DishCandidateFilter, DishTypeId, LabelId, RandomDishQuery};

use super::{
    CreateDishRequest, DishOwnerResponse, DishResponse, RandomDishesQuery, UpdateDishRequest,
};
use crate::dto::catalog::{DishTypeResponse, LabelResponse};

impl From<Dish> for DishResponse {
    fn from(dish: Dish) -> Self {
        Self {
            id: dish.id().as_i64(),
            name: dish.name().as_str().to_owned(),
            image_path: dish.image_path().map(ToOwned::to_owned),
            owner: DishOwnerResponse {
                id: dish.owner_id().as_i64(),
                username: dish.owner().username().as_str().to_owned(),
            },
            labels: dish.labels().iter().map(LabelResponse::from).collect(),
            dish_types: dish
                .dish_types()
                .iter()
                .map(DishTypeResponse::from)
                .collect(),
            created_at: dish.created_at().to_rfc3339(),
            last_update_at: dish.last_update_at().to_rfc3339(),
        }
    }
}

impl From<CreateDishRequest> for CreateDishParams {
    fn from(value: CreateDishRequest) -> Self {
        Self {
            name: value.name,
            label_ids: label_ids(value.labels.unwrap_or_default()),
            dish_type_ids: dish_type_ids(value.dish_types),
            image_path: value.image_path,
        }
    }
}

impl From<UpdateDishRequest> for UpdateDishParams {
    fn from(value: UpdateDishRequest) -> Self {
        Self {
            name: value.name,
            label_ids: value.labels.map(label_ids),
            dish_type_ids: value.dish_types.map(dish_type_ids),
            image_path: value.image_path,
        }
    }
}

impl RandomDishesQuery {
    /// Validates the query string into a random draw request.
    pub fn into_query(self) -> AppResult<RandomDishQuery> {
        let labels = parse_label_list(self.labels.as_deref())?;
        RandomDishQuery::new(
            DishCandidateFilter::new(DishTypeId::new(self.dish_type), labels),
            self.limit,
        )
    }
}

fn label_ids(ids: Vec<i64>) -> Vec<LabelId> {
    ids.into_iter().map(LabelId::new).collect()
}

fn dish_type_ids(ids: Vec<i64>) -> Vec<DishTypeId> {
    ids.into_iter().map(DishTypeId::new).collect()
}

/// Parses `"1,4"` into label ids. Empty segments are ignored.
fn parse_label_list(raw: Option<&str>) -> AppResult<Vec<LabelId>> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            segment
                .parse::<i64>()
                .map(LabelId::new)
                .map_err(|_| AppError::Validation(format!("invalid label id '{segment}'")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use dishpicker_application::UpdateDishParams;
    use dishpicker_domain::{DishTypeId, LabelId};

    use super::parse_label_list;
    use crate::dto::{RandomDishesQuery, UpdateDishRequest};

    #[test]
    fn label_list_parses_comma_separated_ids() {
        assert_eq!(
            parse_label_list(Some("4, 5,,")).ok(),
            Some(vec![LabelId::new(4), LabelId::new(5)])
        );
        assert_eq!(parse_label_list(None).ok(), Some(Vec::new()));
        assert!(parse_label_list(Some("4,meat")).is_err());
    }

    #[test]
    fn random_query_validates_limit() {
        let query = RandomDishesQuery {
            dish_type: 3,
            labels: Some("5".to_owned()),
            limit: 2,
        }
        .into_query();
        let query = query.ok();
        assert_eq!(query.as_ref().map(|query| query.limit()), Some(2));
        assert_eq!(
            query.map(|query| query.filter().dish_type()),
            Some(DishTypeId::new(3))
        );

        let too_many = RandomDishesQuery {
            dish_type: 3,
            labels: None,
            limit: 101,
        }
        .into_query();
        assert!(too_many.is_err());
    }

    #[test]
    fn empty_label_list_in_update_is_kept_as_clear() {
        let params = UpdateDishParams::from(UpdateDishRequest {
            labels: Some(Vec::new()),
            ..UpdateDishRequest::default()
        });
        assert_eq!(params.label_ids, Some(Vec::new()));
        assert_eq!(params.dish_type_ids, None);
    }
}
