//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod postgres_catalog_repository;
mod postgres_decision_tree_repository;
mod postgres_dish_repository;
mod postgres_user_repository;

#[cfg(test)]
mod test_database;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use postgres_catalog_repository::PostgresCatalogRepository;
pub use postgres_decision_tree_repository::PostgresDecisionTreeRepository;
pub use postgres_dish_repository::PostgresDishRepository;
pub use postgres_user_repository::PostgresUserRepository;
