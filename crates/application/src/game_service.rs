use std::collections::BTreeSet;
use std::sync::Arc;

use dishpicker_core::{AppError, AppResult};
use dishpicker_domain::{
    Decision, DecisionChoice, DecisionTree, Dish, DishCandidateFilter, DishId, DishTypeId,
    GAME_ROUNDS_MAX, LabelId, Principal, RandomDishQuery, validate_decisions,
};

use crate::DishService;
use crate::dish_ports::{DecisionTreeRepository, DishRepository};

#[cfg(test)]
mod tests;

/// Hint returned when the filters leave too few dishes for a game.
pub const NOT_ENOUGH_DISHES_MESSAGE: &str =
    "Not enough dishes found for these parameters. Try filtering differently.";

/// Parameters for starting a game.
#[derive(Debug, Clone)]
pub struct StartGameParams {
    /// Meal category to draw from.
    pub dish_type: DishTypeId,
    /// Labels every drawn dish must carry.
    pub label_ids: Vec<LabelId>,
    /// Number of decision rounds.
    pub rounds: i64,
}

/// Dishes drawn for a new game.
#[derive(Debug, Clone)]
pub struct GameStart {
    /// Number of decision rounds.
    pub rounds: usize,
    /// Drawn dishes, two per round.
    pub dishes: Vec<Dish>,
}

/// One decision submitted by the client.
#[derive(Debug, Clone, Copy)]
pub struct DecisionInput {
    /// 0-based round position.
    pub position: u32,
    /// First dish offered.
    pub option_one: DishId,
    /// Second dish offered.
    pub option_two: DishId,
    /// Chosen option.
    pub choice: DecisionChoice,
}

/// Application service for decision rounds.
#[derive(Clone)]
pub struct GameService {
    dish_service: DishService,
    dish_repository: Arc<dyn DishRepository>,
    decision_tree_repository: Arc<dyn DecisionTreeRepository>,
}

impl GameService {
    /// Creates a new game service.
    #[must_use]
    pub fn new(
        dish_service: DishService,
        dish_repository: Arc<dyn DishRepository>,
        decision_tree_repository: Arc<dyn DecisionTreeRepository>,
    ) -> Self {
        Self {
            dish_service,
            dish_repository,
            decision_tree_repository,
        }
    }

    /// Draws two dishes per round for a new game.
    ///
    /// Fails with a validation error carrying [`NOT_ENOUGH_DISHES_MESSAGE`]
    /// when the filters match too few dishes.
    pub async fn start_game(
        &self,
        principal: Principal,
        params: StartGameParams,
    ) -> AppResult<GameStart> {
        if !(1..=GAME_ROUNDS_MAX).contains(&params.rounds) {
            return Err(AppError::Validation(format!(
                "rounds must be between 1 and {GAME_ROUNDS_MAX}"
            )));
        }

        let query = RandomDishQuery::new(
            DishCandidateFilter::new(params.dish_type, params.label_ids),
            params.rounds * 2,
        )?;
        let dishes = self.dish_service.random_dishes(principal, &query).await?;

        if dishes.len() < query.limit() {
            return Err(AppError::Validation(NOT_ENOUGH_DISHES_MESSAGE.to_owned()));
        }

        Ok(GameStart {
            rounds: query.limit() / 2,
            dishes,
        })
    }

    /// Stores the decisions of a finished game for the principal.
    pub async fn save_decision_tree(
        &self,
        principal: Principal,
        inputs: Vec<DecisionInput>,
    ) -> AppResult<DecisionTree> {
        let mut decisions = inputs
            .into_iter()
            .map(|input| {
                Decision::new(
                    input.position,
                    input.option_one,
                    input.option_two,
                    input.choice,
                )
            })
            .collect::<AppResult<Vec<_>>>()?;
        decisions.sort_by_key(Decision::position);
        validate_decisions(&decisions)?;

        let referenced: BTreeSet<DishId> = decisions
            .iter()
            .flat_map(|decision| [decision.option_one(), decision.option_two()])
            .collect();
        let referenced: Vec<DishId> = referenced.into_iter().collect();
        let found: BTreeSet<DishId> = self
            .dish_repository
            .find_by_ids(&referenced)
            .await?
            .iter()
            .map(Dish::id)
            .collect();

        if let Some(missing) = referenced.iter().find(|id| !found.contains(id)) {
            return Err(AppError::NotFound(format!("dish '{missing}' not found")));
        }

        self.decision_tree_repository
            .create(principal.id(), decisions)
            .await
    }

    /// Lists all stored decision trees, newest first.
    pub async fn list_decision_trees(&self) -> AppResult<Vec<DecisionTree>> {
        self.decision_tree_repository.list().await
    }
}
