mod auth;
mod catalog;
mod common;
mod dishes;
mod game;
mod users;

pub use auth::{LoginRequest, RegisterRequest};
pub use catalog::{DishTypeResponse, LabelResponse};
pub use common::{HealthDependencyStatus, HealthResponse};
pub use dishes::{
    CreateDishRequest, DishResponse, ListDishesQuery, RandomDishesQuery, UpdateDishRequest,
};
pub use game::{
    DecisionTreeResponse, GameStartResponse, SaveDecisionTreeRequest, StartGameRequest,
};
pub use users::{SetUserImageRequest, UpdateUserRequest, UserResponse};
