use std::collections::HashMap;
use std::sync::Arc;

use dishpicker_core::{AppError, AppResult};
use dishpicker_domain::{
    Action, Dish, DishId, DishName, DishTypeId, LabelId, Principal, RandomDishQuery,
    ResourceKind, UserId,
};

use crate::dish_ports::{DishChanges, DishRepository, NewDish};
use crate::{AuthorizationService, CatalogService, random_selection};


/// Parameters for creating a dish.
#[derive(Debug, Clone, Default)]
pub struct CreateDishParams {
    /// Dish name.
    pub name: String,
    /// Dietary labels.
    pub label_ids: Vec<LabelId>,
    /// Meal categories; at least one is required.
    pub dish_type_ids: Vec<DishTypeId>,
    /// Path of an already stored image.
    pub image_path: Option<String>,
}

/// Parameters for a partial dish update.
#[derive(Debug, Clone, Default)]
pub struct UpdateDishParams {
    /// New dish name.
    pub name: Option<String>,
    /// Replacement labels; an empty list clears them.
    pub label_ids: Option<Vec<LabelId>>,
    /// Replacement meal categories.
    pub dish_type_ids: Option<Vec<DishTypeId>>,
    /// New image path.
    pub image_path: Option<String>,
}

/// Application service for the dish catalog and random draws.
#[derive(Clone)]
pub struct DishService {
    repository: Arc<dyn DishRepository>,
    catalog: CatalogService,
    authorization: AuthorizationService,
}

impl DishService {
    /// Creates a new dish service.
    #[must_use]
    pub fn new(
        repository: Arc<dyn DishRepository>,
        catalog: CatalogService,
        authorization: AuthorizationService,
    ) -> Self {
        Self {
            repository,
            catalog,
            authorization,
        }
    }

    /// Lists dishes, newest update first, optionally for one owner.
    pub async fn list_dishes(
        &self,
        principal: Principal,
        owner_id: Option<UserId>,
    ) -> AppResult<Vec<Dish>> {
        self.authorization
            .require_collection(principal, Action::Read, ResourceKind::Dish)?;

        self.repository.list(owner_id).await
    }

    /// Creates a dish owned by the principal.
    pub async fn create_dish(
        &self,
        principal: Principal,
        params: CreateDishParams,
    ) -> AppResult<Dish> {
        self.authorization
            .require_collection(principal, Action::Create, ResourceKind::Dish)?;

        let name = DishName::new(params.name)?;
        if params.dish_type_ids.is_empty() {
            return Err(AppError::Validation(
                "a dish needs at least one dish type".to_owned(),
            ));
        }

        let label_ids = self.catalog.resolve_labels(&params.label_ids).await?;
        let dish_type_ids = self
            .catalog
            .resolve_dish_types(&params.dish_type_ids)
            .await?;
        self.ensure_name_available(&name, None).await?;

        self.repository
            .create(NewDish {
                name,
                owner_id: principal.id(),
                image_path: normalize_image_path(params.image_path),
                label_ids,
                dish_type_ids,
            })
            .await
    }

    /// Returns one dish.
    pub async fn get_dish(&self, principal: Principal, dish_id: DishId) -> AppResult<Dish> {
        let dish = self.load(dish_id).await?;
        self.authorization
            .require_on(principal, Action::Read, &dish)?;

        Ok(dish)
    }

    /// Applies a partial update to a dish.
    pub async fn update_dish(
        &self,
        principal: Principal,
        dish_id: DishId,
        params: UpdateDishParams,
    ) -> AppResult<Dish> {
        let dish = self.load(dish_id).await?;
        self.authorization
            .require_on(principal, Action::Update, &dish)?;

        let name = params.name.map(DishName::new).transpose()?;
        if let Some(name) = &name {
            self.ensure_name_available(name, Some(dish_id)).await?;
        }

        let label_ids = match params.label_ids {
            Some(ids) => Some(self.catalog.resolve_labels(&ids).await?),
            None => None,
        };

        let dish_type_ids = match params.dish_type_ids {
            Some(ids) if ids.is_empty() => {
                return Err(AppError::Validation(
                    "a dish needs at least one dish type".to_owned(),
                ));
            }
            Some(ids) => Some(self.catalog.resolve_dish_types(&ids).await?),
            None => None,
        };

        self.repository
            .update(
                dish_id,
                DishChanges {
                    name,
                    image_path: normalize_image_path(params.image_path),
                    label_ids,
                    dish_type_ids,
                },
            )
            .await
    }

    /// Deletes a dish.
    pub async fn delete_dish(&self, principal: Principal, dish_id: DishId) -> AppResult<()> {
        let dish = self.load(dish_id).await?;
        self.authorization
            .require_on(principal, Action::Delete, &dish)?;

        self.repository.delete(dish_id).await
    }

    /// Draws up to `query.limit()` random dishes matching the query filter.
    ///
    /// An undersized candidate pool yields fewer dishes, never an error.
    pub async fn random_dishes(
        &self,
        principal: Principal,
        query: &RandomDishQuery,
    ) -> AppResult<Vec<Dish>> {
        self.authorization
            .require_collection(principal, Action::Read, ResourceKind::Dish)?;

        let pool = self.repository.candidate_ids(query.filter()).await?;
        let limit = i64::try_from(query.limit()).unwrap_or(i64::MAX);
        let sampled = random_selection::sample(pool, limit);
        if sampled.is_empty() {
            return Ok(Vec::new());
        }

        let mut by_id: HashMap<DishId, Dish> = self
            .repository
            .find_by_ids(&sampled)
            .await?
            .into_iter()
            .map(|dish| (dish.id(), dish))
            .collect();

        Ok(sampled
            .iter()
            .filter_map(|dish_id| by_id.remove(dish_id))
            .collect())
    }

    async fn load(&self, dish_id: DishId) -> AppResult<Dish> {
        self.repository
            .find_by_id(dish_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("dish '{dish_id}' not found")))
    }

    async fn ensure_name_available(
        &self,
        name: &DishName,
        current: Option<DishId>,
    ) -> AppResult<()> {
        match self.repository.find_by_name(name).await? {
            Some(existing) if Some(existing.id()) != current => Err(AppError::Conflict(format!(
                "a dish named '{}' already exists",
                name.as_str()
            ))),
            _ => Ok(()),
        }
    }
}

fn normalize_image_path(path: Option<String>) -> Option<String> {
    path.map(|path| path.trim().to_owned())
        .filter(|path| !path.is_empty())
}
