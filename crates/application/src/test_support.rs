//! In-memory fakes shared by the dish and game service tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dishpicker_core::{AppError, AppResult};
use dishpicker_domain::{
    Decision, DecisionTree, Dish, DishCandidateFilter, DishId, DishInput, DishName, DishType,
    DishTypeId, EmailAddress, Label, LabelId, Principal, Role, User, UserId, Username,
};
use tokio::sync::Mutex;

use crate::dish_ports::{
    CatalogRepository, DecisionTreeRepository, DishChanges, DishRepository, NewDish,
};
use crate::{AuthorizationService, CatalogService, DishService};

pub(crate) const BREAKFAST: DishTypeId = DishTypeId::new(1);
pub(crate) const DINNER: DishTypeId = DishTypeId::new(3);
pub(crate) const NO_GLUTEN: LabelId = LabelId::new(4);
pub(crate) const NO_MEAT: LabelId = LabelId::new(5);

pub(crate) fn admin() -> Principal {
    Principal::new(UserId::new(1), Role::Admin)
}

pub(crate) fn regular(id: i64) -> Principal {
    Principal::new(UserId::new(id), Role::User)
}

pub(crate) fn user(id: i64, role: Role) -> User {
    User::new(
        UserId::new(id),
        Username::new(format!("user{id}")).unwrap_or_else(|_| panic!("username")),
        EmailAddress::new(format!("user{id}@web.de")).unwrap_or_else(|_| panic!("email")),
        role,
        None,
        Utc::now(),
    )
}

fn labels() -> Vec<Label> {
    ["No Dairy", "No Eggs", "No Fish", "No Gluten", "No Meat"]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| Label::new(LabelId::new(id), name).unwrap_or_else(|_| panic!("label")))
        .collect()
}

fn dish_types() -> Vec<DishType> {
    ["Breakfast", "Lunch", "Dinner", "Dessert"]
        .into_iter()
        .zip(1..)
        .map(|(name, id)| {
            DishType::new(DishTypeId::new(id), name).unwrap_or_else(|_| panic!("dish type"))
        })
        .collect()
}

pub(crate) struct FakeCatalogRepository {
    labels: Vec<Label>,
    dish_types: Vec<DishType>,
}

impl Default for FakeCatalogRepository {
    fn default() -> Self {
        Self {
            labels: labels(),
            dish_types: dish_types(),
        }
    }
}

#[async_trait]
impl CatalogRepository for FakeCatalogRepository {
    async fn list_labels(&self) -> AppResult<Vec<Label>> {
        Ok(self.labels.clone())
    }

    async fn list_dish_types(&self) -> AppResult<Vec<DishType>> {
        Ok(self.dish_types.clone())
    }

    async fn find_labels(&self, ids: &[LabelId]) -> AppResult<Vec<Label>> {
        Ok(self
            .labels
            .iter()
            .filter(|label| ids.contains(&label.id()))
            .cloned()
            .collect())
    }

    async fn find_dish_types(&self, ids: &[DishTypeId]) -> AppResult<Vec<DishType>> {
        Ok(self
            .dish_types
            .iter()
            .filter(|dish_type| ids.contains(&dish_type.id()))
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct FakeDishRepository {
    owners: HashMap<UserId, User>,
    dishes: Mutex<Vec<Dish>>,
    next_id: Mutex<i64>,
}

impl FakeDishRepository {
    pub(crate) fn with_owners(owners: impl IntoIterator<Item = User>) -> Self {
        Self {
            owners: owners.into_iter().map(|user| (user.id(), user)).collect(),
            dishes: Mutex::new(Vec::new()),
            next_id: Mutex::new(0),
        }
    }

    pub(crate) async fn all(&self) -> Vec<Dish> {
        self.dishes.lock().await.clone()
    }

    fn owner(&self, owner_id: UserId) -> AppResult<User> {
        self.owners
            .get(&owner_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("user '{owner_id}' not found")))
    }
}

fn build_dish(
    id: DishId,
    values: NewDish,
    owner: User,
    created_at: DateTime<Utc>,
    last_update_at: DateTime<Utc>,
) -> Dish {
    Dish::new(DishInput {
        id,
        name: values.name,
        image_path: values.image_path,
        owner,
        labels: labels()
            .into_iter()
            .filter(|label| values.label_ids.contains(&label.id()))
            .collect(),
        dish_types: dish_types()
            .into_iter()
            .filter(|dish_type| values.dish_type_ids.contains(&dish_type.id()))
            .collect(),
        created_at,
        last_update_at,
    })
}

#[async_trait]
impl DishRepository for FakeDishRepository {
    async fn list(&self, owner_id: Option<UserId>) -> AppResult<Vec<Dish>> {
        let mut dishes: Vec<Dish> = self
            .dishes
            .lock()
            .await
            .iter()
            .filter(|dish| owner_id.is_none_or(|owner_id| dish.owner_id() == owner_id))
            .cloned()
            .collect();
        dishes.sort_by_key(|dish| std::cmp::Reverse(dish.last_update_at()));
        Ok(dishes)
    }

    async fn find_by_id(&self, dish_id: DishId) -> AppResult<Option<Dish>> {
        Ok(self
            .dishes
            .lock()
            .await
            .iter()
            .find(|dish| dish.id() == dish_id)
            .cloned())
    }

    async fn find_by_name(&self, name: &DishName) -> AppResult<Option<Dish>> {
        Ok(self
            .dishes
            .lock()
            .await
            .iter()
            .find(|dish| dish.name() == name)
            .cloned())
    }

    async fn find_by_ids(&self, ids: &[DishId]) -> AppResult<Vec<Dish>> {
        Ok(self
            .dishes
            .lock()
            .await
            .iter()
            .filter(|dish| ids.contains(&dish.id()))
            .cloned()
            .collect())
    }

    async fn candidate_ids(&self, filter: &DishCandidateFilter) -> AppResult<Vec<DishId>> {
        Ok(self
            .dishes
            .lock()
            .await
            .iter()
            .filter(|dish| filter.matches(dish))
            .map(Dish::id)
            .collect())
    }

    async fn create(&self, new_dish: NewDish) -> AppResult<Dish> {
        let owner = self.owner(new_dish.owner_id)?;
        let mut next_id = self.next_id.lock().await;
        *next_id += 1;

        // Strictly increasing timestamps keep "newest first" deterministic.
        let created_at = Utc::now() + Duration::seconds(*next_id);
        let dish = build_dish(DishId::new(*next_id), new_dish, owner, created_at, created_at);
        self.dishes.lock().await.push(dish.clone());
        Ok(dish)
    }

    async fn update(&self, dish_id: DishId, changes: DishChanges) -> AppResult<Dish> {
        let mut dishes = self.dishes.lock().await;
        let slot = dishes
            .iter_mut()
            .find(|dish| dish.id() == dish_id)
            .ok_or_else(|| AppError::NotFound(format!("dish '{dish_id}' not found")))?;

        let current = slot.clone();
        let label_ids = changes
            .label_ids
            .unwrap_or_else(|| current.labels().iter().map(Label::id).collect());
        let dish_type_ids = changes
            .dish_type_ids
            .unwrap_or_else(|| current.dish_types().iter().map(DishType::id).collect());

        let values = NewDish {
            name: changes.name.unwrap_or_else(|| current.name().clone()),
            owner_id: current.owner_id(),
            image_path: changes
                .image_path
                .or_else(|| current.image_path().map(str::to_owned)),
            label_ids,
            dish_type_ids,
        };
        *slot = build_dish(
            current.id(),
            values,
            current.owner().clone(),
            current.created_at(),
            current.last_update_at() + Duration::hours(1),
        );
        Ok(slot.clone())
    }

    async fn delete(&self, dish_id: DishId) -> AppResult<()> {
        self.dishes.lock().await.retain(|dish| dish.id() != dish_id);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeDecisionTreeRepository {
    trees: Mutex<Vec<DecisionTree>>,
}

#[async_trait]
impl DecisionTreeRepository for FakeDecisionTreeRepository {
    async fn create(&self, owner_id: UserId, decisions: Vec<Decision>) -> AppResult<DecisionTree> {
        let mut trees = self.trees.lock().await;
        let id = i64::try_from(trees.len()).unwrap_or_default() + 1;
        let tree = DecisionTree::new(id, owner_id, decisions, Utc::now())?;
        trees.push(tree.clone());
        Ok(tree)
    }

    async fn list(&self) -> AppResult<Vec<DecisionTree>> {
        Ok(self.trees.lock().await.iter().rev().cloned().collect())
    }
}

pub(crate) fn dish_service(repository: Arc<FakeDishRepository>) -> DishService {
    DishService::new(
        repository,
        CatalogService::new(Arc::new(FakeCatalogRepository::default())),
        AuthorizationService::new(),
    )
}
