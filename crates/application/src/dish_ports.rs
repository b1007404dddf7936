use async_trait::async_trait;
use dishpicker_core::AppResult;
use dishpicker_domain::{
    Decision, DecisionTree, Dish, DishCandidateFilter, DishId, DishName, DishType, DishTypeId,
    Label, LabelId, UserId,
};

/// Values for a new dish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDish {
    /// Unique dish name.
    pub name: DishName,
    /// Creating account.
    pub owner_id: UserId,
    /// Path of an already stored image.
    pub image_path: Option<String>,
    /// Dietary labels.
    pub label_ids: Vec<LabelId>,
    /// Meal categories.
    pub dish_type_ids: Vec<DishTypeId>,
}

/// Partial dish update. `None` leaves a value unchanged; an empty label list
/// clears all labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DishChanges {
    /// New dish name.
    pub name: Option<DishName>,
    /// New image path.
    pub image_path: Option<String>,
    /// Replacement label set.
    pub label_ids: Option<Vec<LabelId>>,
    /// Replacement dish type set.
    pub dish_type_ids: Option<Vec<DishTypeId>>,
}

/// Repository port for labels and dish types.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Lists all labels ordered by id.
    async fn list_labels(&self) -> AppResult<Vec<Label>>;

    /// Lists all dish types ordered by id.
    async fn list_dish_types(&self) -> AppResult<Vec<DishType>>;

    /// Returns the labels that exist among `ids`.
    async fn find_labels(&self, ids: &[LabelId]) -> AppResult<Vec<Label>>;

    /// Returns the dish types that exist among `ids`.
    async fn find_dish_types(&self, ids: &[DishTypeId]) -> AppResult<Vec<DishType>>;
}

/// Repository port for dishes.
#[async_trait]
pub trait DishRepository: Send + Sync {
    /// Lists dishes, newest update first, optionally restricted to one owner.
    async fn list(&self, owner_id: Option<UserId>) -> AppResult<Vec<Dish>>;

    /// Finds a dish by id.
    async fn find_by_id(&self, dish_id: DishId) -> AppResult<Option<Dish>>;

    /// Finds a dish by its unique name.
    async fn find_by_name(&self, name: &DishName) -> AppResult<Option<Dish>>;

    /// Loads the dishes that exist among `ids`, in no particular order.
    async fn find_by_ids(&self, ids: &[DishId]) -> AppResult<Vec<Dish>>;

    /// Returns the ids of every dish matching the candidate filter.
    async fn candidate_ids(&self, filter: &DishCandidateFilter) -> AppResult<Vec<DishId>>;

    /// Creates a dish. Fails with `Conflict` when the name is taken.
    async fn create(&self, new_dish: NewDish) -> AppResult<Dish>;

    /// Applies a partial update and bumps the last update time.
    async fn update(&self, dish_id: DishId, changes: DishChanges) -> AppResult<Dish>;

    /// Deletes a dish and the decisions referencing it.
    async fn delete(&self, dish_id: DishId) -> AppResult<()>;
}

/// Repository port for finished games.
#[async_trait]
pub trait DecisionTreeRepository: Send + Sync {
    /// Persists the decisions of one game.
    async fn create(&self, owner_id: UserId, decisions: Vec<Decision>) -> AppResult<DecisionTree>;

    /// Lists all decision trees, newest first.
    async fn list(&self) -> AppResult<Vec<DecisionTree>>;
}
