//! Application services and ports.

#![forbid(unsafe_code)]

mod authorization_service;
mod catalog_service;
mod dish_ports;
mod dish_service;
mod game_service;
mod user_service;

/// Uniform random subsets of candidate pools.
pub mod random_selection;

#[cfg(test)]
mod test_support;

pub use authorization_service::{AuthorizationService, FORBIDDEN_MESSAGE};
pub use catalog_service::CatalogService;
pub use dish_ports::{
    CatalogRepository, DecisionTreeRepository, DishChanges, DishRepository, NewDish,
};
pub use dish_service::{CreateDishParams, DishService, UpdateDishParams};
pub use game_service::{
    DecisionInput, GameService, GameStart, NOT_ENOUGH_DISHES_MESSAGE, StartGameParams,
};
pub use user_service::{
    AuthOutcome, LOGIN_FAILED_MESSAGE, NewUser, PasswordHasher, RegisterParams, UpdateUserParams,
    UserChanges, UserRecord, UserRepository, UserService,
};
