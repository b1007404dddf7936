//! Domain entities and invariants.

#![forbid(unsafe_code)]

mod authorization;
mod decision;
mod dish;
mod user;

pub use authorization::{
    Ability, Action, Condition, Ownable, PermissionRule, Principal, ResourceKind, RuleScope,
    Target, is_allowed,
};
pub use decision::{
    Decision, DecisionChoice, DecisionTree, GAME_ROUNDS_MAX, validate_decisions,
};
pub use dish::{
    DISH_NAME_MAX_LENGTH, Dish, DishCandidateFilter, DishId, DishInput, DishName, DishType,
    DishTypeId, Label, LabelId, RANDOM_DISH_LIMIT_MAX, RandomDishQuery,
};
pub use user::{
    EmailAddress, PASSWORD_MAX_LENGTH, PASSWORD_MIN_LENGTH, Role, USER_TEXT_MAX_LENGTH, User,
    UserId, Username, validate_password,
};
