use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post, put};
use dishpicker_core::AppError;
use tower_http::trace::TraceLayer;
use tower_sessions::SessionManagerLayer;
use tower_sessions_sqlx_store::PostgresStore;

use crate::state::AppState;
use crate::{auth, handlers, middleware};

mod cors;

pub fn build_router(
    app_state: AppState,
    frontend_url: &str,
    session_layer: SessionManagerLayer<PostgresStore>,
) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/auth/me", get(auth::me_handler))
        .route("/api/users", get(handlers::users::list_users_handler))
        .route(
            "/api/users/{user_id}",
            get(handlers::users::get_user_handler)
                .patch(handlers::users::update_user_handler)
                .delete(handlers::users::delete_user_handler),
        )
        .route(
            "/api/users/{user_id}/image",
            put(handlers::users::set_user_image_handler)
                .delete(handlers::users::delete_user_image_handler),
        )
        .route("/api/labels", get(handlers::catalog::list_labels_handler))
        .route(
            "/api/dish-types",
            get(handlers::catalog::list_dish_types_handler),
        )
        .route(
            "/api/dishes",
            get(handlers::dishes::list_dishes_handler).post(handlers::dishes::create_dish_handler),
        )
        .route(
            "/api/dishes/random",
            get(handlers::dishes::random_dishes_handler),
        )
        .route(
            "/api/dishes/{dish_id}",
            get(handlers::dishes::get_dish_handler)
                .patch(handlers::dishes::update_dish_handler)
                .delete(handlers::dishes::delete_dish_handler),
        )
        .route("/api/game/start", post(handlers::game::start_game_handler))
        .route(
            "/api/decision-trees",
            get(handlers::game::list_decision_trees_handler)
                .post(handlers::game::save_decision_tree_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_auth,
        ));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .merge(protected_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_same_origin_for_mutations,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .layer(session_layer)
        .with_state(app_state))
}
