use axum::Json;
use axum::extract::{Extension, State};
use axum::http::StatusCode;
use dishpicker_domain::Principal;
use tracing::info;

use crate::dto::{
    DecisionTreeResponse, GameStartResponse, SaveDecisionTreeRequest, StartGameRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;

pub async fn start_game_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<StartGameRequest>,
) -> ApiResult<Json<GameStartResponse>> {
    let game = state
        .game_service
        .start_game(principal, payload.into())
        .await?;

    Ok(Json(GameStartResponse::from(game)))
}

pub async fn save_decision_tree_handler(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<SaveDecisionTreeRequest>,
) -> ApiResult<(StatusCode, Json<DecisionTreeResponse>)> {
    let tree = state
        .game_service
        .save_decision_tree(principal, payload.into_inputs()?)
        .await?;

    info!(
        tree_id = tree.id(),
        size = tree.size(),
        user_id = %principal.id(),
        "decision tree stored"
    );
    Ok((StatusCode::CREATED, Json(DecisionTreeResponse::from(tree))))
}

pub async fn list_decision_trees_handler(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<DecisionTreeResponse>>> {
    let trees = state
        .game_service
        .list_decision_trees()
        .await?
        .into_iter()
        .map(DecisionTreeResponse::from)
        .collect();

    Ok(Json(trees))
}
