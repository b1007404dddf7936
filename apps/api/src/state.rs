use dishpicker_application::{CatalogService, DishService, GameService, UserService};
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub catalog_service: CatalogService,
    pub dish_service: DishService,
    pub game_service: GameService,
    pub frontend_url: String,
    pub postgres_pool: PgPool,
}
