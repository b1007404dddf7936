use std::sync::Arc;

use dishpicker_application::{
    AuthorizationService, CatalogService, DishService, GameService, UserService,
};
use dishpicker_infrastructure::{
    Argon2PasswordHasher, PostgresCatalogRepository, PostgresDecisionTreeRepository,
    PostgresDishRepository, PostgresUserRepository,
};
use sqlx::PgPool;

use crate::api_config::ApiConfig;
use crate::state::AppState;

struct RepositorySet {
    user_repository: Arc<PostgresUserRepository>,
    catalog_repository: Arc<PostgresCatalogRepository>,
    dish_repository: Arc<PostgresDishRepository>,
    decision_tree_repository: Arc<PostgresDecisionTreeRepository>,
}

fn build_repository_set(pool: &PgPool) -> RepositorySet {
    RepositorySet {
        user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
        catalog_repository: Arc::new(PostgresCatalogRepository::new(pool.clone())),
        dish_repository: Arc::new(PostgresDishRepository::new(pool.clone())),
        decision_tree_repository: Arc::new(PostgresDecisionTreeRepository::new(pool.clone())),
    }
}

pub fn build_app_state(pool: PgPool, config: &ApiConfig) -> AppState {
    let repositories = build_repository_set(&pool);
    let authorization_service = AuthorizationService::new();

    let user_service = UserService::new(
        repositories.user_repository,
        Arc::new(Argon2PasswordHasher::new()),
        authorization_service,
    );
    let catalog_service = CatalogService::new(repositories.catalog_repository);
    let dish_service = DishService::new(
        repositories.dish_repository.clone(),
        catalog_service.clone(),
        authorization_service,
    );
    let game_service = GameService::new(
        dish_service.clone(),
        repositories.dish_repository,
        repositories.decision_tree_repository,
    );

    AppState {
        user_service,
        catalog_service,
        dish_service,
        game_service,
        frontend_url: config.frontend_url.clone(),
        postgres_pool: pool,
    }
}
