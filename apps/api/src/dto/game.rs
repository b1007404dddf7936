use dishpicker_application::{DecisionInput, GameStart, StartGameParams};
use dishpicker_core::AppResult;
use dishpicker_domain::{Decision, DecisionChoice, DecisionTree, DishId, DishTypeId, LabelId};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::dishes::DishResponse;

/// Incoming payload for starting a game.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/start-game-request.ts"
)]
pub struct StartGameRequest {
    #[ts(type = "number")]
    pub dish_type: i64,
    #[serde(default)]
    #[ts(type = "Array<number> | null")]
    pub labels: Option<Vec<i64>>,
    #[ts(type = "number")]
    pub rounds: i64,
}

/// Dishes drawn for a new game, two per round in play order.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/game-start-response.ts"
)]
pub struct GameStartResponse {
    #[ts(type = "number")]
    pub rounds: usize,
    pub dishes: Vec<DishResponse>,
}

/// One decided round of a finished game.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/decision-request.ts"
)]
pub struct DecisionRequest {
    pub position: u32,
    #[ts(type = "number")]
    pub option_one: i64,
    #[ts(type = "number")]
    pub option_two: i64,
    #[ts(type = "\"option_one\" | \"option_two\"")]
    pub decision: String,
}

/// Incoming payload for storing a finished game.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/save-decision-tree-request.ts"
)]
pub struct SaveDecisionTreeRequest {
    pub decisions: Vec<DecisionRequest>,
}

/// API representation of one stored decision.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/decision-response.ts"
)]
pub struct DecisionResponse {
    pub position: u32,
    #[ts(type = "number")]
    pub option_one: i64,
    #[ts(type = "number")]
    pub option_two: i64,
    #[ts(type = "\"option_one\" | \"option_two\"")]
    pub decision: String,
}

/// API representation of a finished game.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/decision-tree-response.ts"
)]
pub struct DecisionTreeResponse {
    #[ts(type = "number")]
    pub id: i64,
    #[ts(type = "number")]
    pub owner_id: i64,
    #[ts(type = "number")]
    pub size: usize,
    #[ts(type = "number | null")]
    pub final_winner: Option<i64>,
    pub decisions: Vec<DecisionResponse>,
    pub created_at: String,
}

impl From<StartGameRequest> for StartGameParams {
    fn from(value: StartGameRequest) -> Self {
        Self {
            dish_type: DishTypeId::new(value.dish_type),
            label_ids: value
                .labels
                .unwrap_or_default()
                .into_iter()
                .map(LabelId::new)
                .collect(),
            rounds: value.rounds,
        }
    }
}

impl From<GameStart> for GameStartResponse {
    fn from(value: GameStart) -> Self {
        Self {
            rounds: value.rounds,
            dishes: value.dishes.into_iter().map(DishResponse::from).collect(),
        }
    }
}

impl SaveDecisionTreeRequest {
    /// Parses the submitted rounds; unknown choice values are rejected.
    pub fn into_inputs(self) -> AppResult<Vec<DecisionInput>> {
        self.decisions
            .into_iter()
            .map(|decision| {
                Ok(DecisionInput {
                    position: decision.position,
                    option_one: DishId::new(decision.option_one),
                    option_two: DishId::new(decision.option_two),
                    choice: decision.decision.parse::<DecisionChoice>()?,
                })
            })
            .collect()
    }
}

impl From<&Decision> for DecisionResponse {
    fn from(decision: &Decision) -> Self {
        Self {
            position: decision.position(),
            option_one: decision.option_one().as_i64(),
            option_two: decision.option_two().as_i64(),
            decision: decision.choice().as_str().to_owned(),
        }
    }
}

impl From<DecisionTree> for DecisionTreeResponse {
    fn from(tree: DecisionTree) -> Self {
        Self {
            id: tree.id(),
            owner_id: tree.owner_id().as_i64(),
            size: tree.size(),
            final_winner: tree.final_winner().map(|dish_id| dish_id.as_i64()),
            decisions: tree.decisions().iter().map(DecisionResponse::from).collect(),
            created_at: tree.created_at().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use dishpicker_domain::{DecisionChoice, DishId};

    use super::{DecisionRequest, SaveDecisionTreeRequest};

    fn round(position: u32, one: i64, two: i64, decision: &str) -> DecisionRequest {
        DecisionRequest {
            position,
            option_one: one,
            option_two: two,
            decision: decision.to_owned(),
        }
    }

    #[test]
    fn submitted_rounds_become_decision_inputs() {
        let inputs = SaveDecisionTreeRequest {
            decisions: vec![round(0, 1, 2, "option_two"), round(1, 2, 3, "option_one")],
        }
        .into_inputs();

        let inputs = inputs.unwrap_or_default();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].option_two, DishId::new(2));
        assert_eq!(inputs[0].choice, DecisionChoice::OptionTwo);
        assert_eq!(inputs[1].choice, DecisionChoice::OptionOne);
    }

    #[test]
    fn unknown_choice_is_rejected() {
        let inputs = SaveDecisionTreeRequest {
            decisions: vec![round(0, 1, 2, "both")],
        }
        .into_inputs();

        assert!(inputs.is_err());
    }
}
