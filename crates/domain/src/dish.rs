//! Dish catalog types.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use dishpicker_core::{AppError, AppResult, NonEmptyString};
use serde::{Deserialize, Serialize};

use crate::{User, UserId};

/// Maximum length of dish, label and dish type names.
pub const DISH_NAME_MAX_LENGTH: usize = 42;

/// Largest number of dishes a single random draw may request.
pub const RANDOM_DISH_LIMIT_MAX: i64 = 100;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        pub struct $name(i64);

        impl $name {
            /// Creates an identifier from its storage value.
            #[must_use]
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Returns the storage value.
            #[must_use]
            pub fn as_i64(&self) -> i64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
                write!(formatter, "{}", self.0)
            }
        }
    };
}

numeric_id!(
    /// Unique identifier for a dish.
    DishId
);
numeric_id!(
    /// Unique identifier for a dietary label.
    LabelId
);
numeric_id!(
    /// Unique identifier for a dish type (breakfast, lunch, ...).
    DishTypeId
);

/// Dietary label such as "No Meat".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    id: LabelId,
    name: NonEmptyString,
}

impl Label {
    /// Creates a validated label.
    pub fn new(id: LabelId, name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::with_max_length(name, "label name", DISH_NAME_MAX_LENGTH)?,
        })
    }

    /// Returns the label id.
    #[must_use]
    pub fn id(&self) -> LabelId {
        self.id
    }

    /// Returns the label name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Meal category such as "Dinner".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishType {
    id: DishTypeId,
    name: NonEmptyString,
}

impl DishType {
    /// Creates a validated dish type.
    pub fn new(id: DishTypeId, name: impl Into<String>) -> AppResult<Self> {
        Ok(Self {
            id,
            name: NonEmptyString::with_max_length(name, "dish type name", DISH_NAME_MAX_LENGTH)?,
        })
    }

    /// Returns the dish type id.
    #[must_use]
    pub fn id(&self) -> DishTypeId {
        self.id
    }

    /// Returns the dish type name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }
}

/// Validated dish name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DishName(NonEmptyString);

impl DishName {
    /// Creates a validated dish name.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        NonEmptyString::with_max_length(value, "dish name", DISH_NAME_MAX_LENGTH).map(Self)
    }

    /// Returns the dish name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Input payload for constructing a [`Dish`].
#[derive(Debug, Clone)]
pub struct DishInput {
    /// Dish id.
    pub id: DishId,
    /// Dish name.
    pub name: DishName,
    /// Path of the stored dish image, if any.
    pub image_path: Option<String>,
    /// Account that created the dish.
    pub owner: User,
    /// Dietary labels carried by the dish.
    pub labels: Vec<Label>,
    /// Meal categories the dish belongs to.
    pub dish_types: Vec<DishType>,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub last_update_at: DateTime<Utc>,
}

/// Dish with its owner, labels and types resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    id: DishId,
    name: DishName,
    image_path: Option<String>,
    owner: User,
    labels: Vec<Label>,
    dish_types: Vec<DishType>,
    created_at: DateTime<Utc>,
    last_update_at: DateTime<Utc>,
}

impl Dish {
    /// Creates a dish projection. Labels and types are sorted by id and
    /// deduplicated.
    #[must_use]
    pub fn new(input: DishInput) -> Self {
        let mut labels = input.labels;
        labels.sort_by_key(Label::id);
        labels.dedup_by_key(|label| label.id());

        let mut dish_types = input.dish_types;
        dish_types.sort_by_key(DishType::id);
        dish_types.dedup_by_key(|dish_type| dish_type.id());

        Self {
            id: input.id,
            name: input.name,
            image_path: input.image_path,
            owner: input.owner,
            labels,
            dish_types,
            created_at: input.created_at,
            last_update_at: input.last_update_at,
        }
    }

    /// Returns the dish id.
    #[must_use]
    pub fn id(&self) -> DishId {
        self.id
    }

    /// Returns the dish name.
    #[must_use]
    pub fn name(&self) -> &DishName {
        &self.name
    }

    /// Returns the stored image path, if any.
    #[must_use]
    pub fn image_path(&self) -> Option<&str> {
        self.image_path.as_deref()
    }

    /// Returns the account that created the dish.
    #[must_use]
    pub fn owner(&self) -> &User {
        &self.owner
    }

    /// Returns the id of the account that created the dish.
    #[must_use]
    pub fn owner_id(&self) -> UserId {
        self.owner.id()
    }

    /// Returns the dietary labels.
    #[must_use]
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Returns the meal categories.
    #[must_use]
    pub fn dish_types(&self) -> &[DishType] {
        &self.dish_types
    }

    /// Returns the creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last modification time.
    #[must_use]
    pub fn last_update_at(&self) -> DateTime<Utc> {
        self.last_update_at
    }
}

/// Filter for the candidate pool of a random dish draw.
///
/// A dish qualifies when it belongs to `dish_type` and carries every label in
/// `labels`. An empty label set places no label restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DishCandidateFilter {
    dish_type: DishTypeId,
    labels: BTreeSet<LabelId>,
}

impl DishCandidateFilter {
    /// Creates a candidate filter. Duplicate label ids collapse.
    #[must_use]
    pub fn new(dish_type: DishTypeId, labels: impl IntoIterator<Item = LabelId>) -> Self {
        Self {
            dish_type,
            labels: labels.into_iter().collect(),
        }
    }

    /// Returns the required dish type.
    #[must_use]
    pub fn dish_type(&self) -> DishTypeId {
        self.dish_type
    }

    /// Returns the required labels in ascending id order.
    #[must_use]
    pub fn labels(&self) -> Vec<LabelId> {
        self.labels.iter().copied().collect()
    }

    /// Returns whether the dish qualifies for the draw.
    #[must_use]
    pub fn matches(&self, dish: &Dish) -> bool {
        let has_type = dish
            .dish_types()
            .iter()
            .any(|dish_type| dish_type.id() == self.dish_type);
        if !has_type {
            return false;
        }

        let matched_labels = dish
            .labels()
            .iter()
            .filter(|label| self.labels.contains(&label.id()))
            .count();
        matched_labels == self.labels.len()
    }
}

/// Validated parameters for a random dish draw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RandomDishQuery {
    filter: DishCandidateFilter,
    limit: usize,
}

impl RandomDishQuery {
    /// Creates a random dish query. The limit must be within
    /// `1..=RANDOM_DISH_LIMIT_MAX`.
    pub fn new(filter: DishCandidateFilter, limit: i64) -> AppResult<Self> {
        if !(1..=RANDOM_DISH_LIMIT_MAX).contains(&limit) {
            return Err(AppError::Validation(format!(
                "limit must be between 1 and {RANDOM_DISH_LIMIT_MAX}"
            )));
        }

        let limit = usize::try_from(limit)
            .map_err(|error| AppError::Validation(format!("invalid limit: {error}")))?;

        Ok(Self { filter, limit })
    }

    /// Returns the candidate filter.
    #[must_use]
    pub fn filter(&self) -> &DishCandidateFilter {
        &self.filter
    }

    /// Returns the number of dishes requested.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{EmailAddress, Role, Username};

    fn owner() -> User {
        User::new(
            UserId::new(1),
            Username::new("admin").unwrap_or_else(|_| panic!("username")),
            EmailAddress::new("admin@admin.de").unwrap_or_else(|_| panic!("email")),
            Role::Admin,
            None,
            Utc::now(),
        )
    }

    fn label(id: i64) -> Label {
        Label::new(LabelId::new(id), format!("label-{id}")).unwrap_or_else(|_| panic!("label"))
    }

    fn dish_type(id: i64) -> DishType {
        DishType::new(DishTypeId::new(id), format!("type-{id}"))
            .unwrap_or_else(|_| panic!("dish type"))
    }

    fn dish(types: &[i64], labels: &[i64]) -> Dish {
        Dish::new(DishInput {
            id: DishId::new(10),
            name: DishName::new("Ramen").unwrap_or_else(|_| panic!("name")),
            image_path: None,
            owner: owner(),
            labels: labels.iter().copied().map(label).collect(),
            dish_types: types.iter().copied().map(dish_type).collect(),
            created_at: Utc::now(),
            last_update_at: Utc::now(),
        })
    }

    #[test]
    fn dish_name_is_bounded() {
        assert!(DishName::new("").is_err());
        assert!(DishName::new("x".repeat(DISH_NAME_MAX_LENGTH + 1)).is_err());
        assert!(DishName::new("Spaghetti Bolognese").is_ok());
    }

    #[test]
    fn dish_deduplicates_labels_and_types() {
        let dish = dish(&[3, 3, 1], &[5, 2, 5]);
        let type_ids: Vec<i64> = dish.dish_types().iter().map(|t| t.id().as_i64()).collect();
        let label_ids: Vec<i64> = dish.labels().iter().map(|l| l.id().as_i64()).collect();

        assert_eq!(type_ids, vec![1, 3]);
        assert_eq!(label_ids, vec![2, 5]);
    }

    #[test]
    fn filter_requires_dish_type() {
        let filter = DishCandidateFilter::new(DishTypeId::new(2), []);
        assert!(filter.matches(&dish(&[1, 2], &[])));
        assert!(!filter.matches(&dish(&[1, 3], &[])));
    }

    #[test]
    fn filter_requires_every_requested_label() {
        let filter = DishCandidateFilter::new(DishTypeId::new(1), [LabelId::new(1), LabelId::new(4)]);

        assert!(filter.matches(&dish(&[1], &[1, 4])));
        assert!(filter.matches(&dish(&[1], &[1, 2, 4])));
        assert!(!filter.matches(&dish(&[1], &[1])));
        assert!(!filter.matches(&dish(&[1], &[])));
    }

    #[test]
    fn filter_collapses_duplicate_labels() {
        let filter = DishCandidateFilter::new(
            DishTypeId::new(1),
            [LabelId::new(4), LabelId::new(4), LabelId::new(1)],
        );

        assert_eq!(filter.labels(), vec![LabelId::new(1), LabelId::new(4)]);
        assert!(filter.matches(&dish(&[1], &[1, 4])));
    }

    #[test]
    fn random_query_limit_is_bounded() {
        let filter = DishCandidateFilter::new(DishTypeId::new(1), []);

        assert!(RandomDishQuery::new(filter.clone(), 0).is_err());
        assert!(RandomDishQuery::new(filter.clone(), -3).is_err());
        assert!(RandomDishQuery::new(filter.clone(), RANDOM_DISH_LIMIT_MAX + 1).is_err());
        assert_eq!(
            RandomDishQuery::new(filter, 10).map(|query| query.limit()).ok(),
            Some(10)
        );
    }
}
