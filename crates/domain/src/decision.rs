//! Decision rounds of the dish-picking game.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use dishpicker_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

use crate::{DishId, UserId};

/// Largest number of rounds a single game may have.
pub const GAME_ROUNDS_MAX: i64 = 50;

/// Option picked in one decision round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionChoice {
    /// The first dish offered won.
    OptionOne,
    /// The second dish offered won.
    OptionTwo,
}

impl DecisionChoice {
    /// Returns the storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OptionOne => "option_one",
            Self::OptionTwo => "option_two",
        }
    }
}

impl FromStr for DecisionChoice {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "option_one" => Ok(Self::OptionOne),
            "option_two" => Ok(Self::OptionTwo),
            _ => Err(AppError::Validation(format!(
                "unknown decision value '{value}'"
            ))),
        }
    }
}

/// One pairwise comparison between two dishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    position: u32,
    option_one: DishId,
    option_two: DishId,
    choice: DecisionChoice,
}

impl Decision {
    /// Creates a decision. Both options must be different dishes.
    pub fn new(
        position: u32,
        option_one: DishId,
        option_two: DishId,
        choice: DecisionChoice,
    ) -> AppResult<Self> {
        if option_one == option_two {
            return Err(AppError::Validation(format!(
                "decision {position} offers dish {option_one} twice"
            )));
        }

        Ok(Self {
            position,
            option_one,
            option_two,
            choice,
        })
    }

    /// Returns the 0-based round position.
    #[must_use]
    pub fn position(&self) -> u32 {
        self.position
    }

    /// Returns the first option.
    #[must_use]
    pub fn option_one(&self) -> DishId {
        self.option_one
    }

    /// Returns the second option.
    #[must_use]
    pub fn option_two(&self) -> DishId {
        self.option_two
    }

    /// Returns which option was chosen.
    #[must_use]
    pub fn choice(&self) -> DecisionChoice {
        self.choice
    }

    /// Returns the dish that won this round.
    #[must_use]
    pub fn winner(&self) -> DishId {
        match self.choice {
            DecisionChoice::OptionOne => self.option_one,
            DecisionChoice::OptionTwo => self.option_two,
        }
    }

    fn offers(&self, dish: DishId) -> bool {
        self.option_one == dish || self.option_two == dish
    }
}

/// Checks that decisions form one game.
///
/// Positions are contiguous from 0 and the winner of each round is offered
/// again in the next round.
pub fn validate_decisions(decisions: &[Decision]) -> AppResult<()> {
    if decisions.is_empty() {
        return Err(AppError::Validation(
            "a decision tree needs at least one decision".to_owned(),
        ));
    }

    for (index, decision) in decisions.iter().enumerate() {
        let expected = u32::try_from(index)
            .map_err(|error| AppError::Validation(format!("too many decisions: {error}")))?;
        if decision.position() != expected {
            return Err(AppError::Validation(format!(
                "decision at index {index} has position {}, expected {expected}",
                decision.position()
            )));
        }
    }

    for pair in decisions.windows(2) {
        let [previous, next] = pair else {
            continue;
        };

        if !next.offers(previous.winner()) {
            return Err(AppError::Validation(format!(
                "winner of decision {} is not offered in decision {}",
                previous.position(),
                next.position()
            )));
        }
    }

    Ok(())
}

/// A finished game: the ordered decisions one player made.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecisionTree {
    id: i64,
    owner_id: UserId,
    decisions: Vec<Decision>,
    created_at: DateTime<Utc>,
}

impl DecisionTree {
    /// Creates a decision tree. Decisions are ordered by position before
    /// validation.
    pub fn new(
        id: i64,
        owner_id: UserId,
        mut decisions: Vec<Decision>,
        created_at: DateTime<Utc>,
    ) -> AppResult<Self> {
        decisions.sort_by_key(Decision::position);
        validate_decisions(&decisions)?;

        Ok(Self {
            id,
            owner_id,
            decisions,
            created_at,
        })
    }

    /// Returns the tree id.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Returns the player who made the decisions.
    #[must_use]
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Returns the decisions ordered by position.
    #[must_use]
    pub fn decisions(&self) -> &[Decision] {
        &self.decisions
    }

    /// Returns the number of decisions.
    #[must_use]
    pub fn size(&self) -> usize {
        self.decisions.len()
    }

    /// Returns the dish chosen in the last round.
    #[must_use]
    pub fn final_winner(&self) -> Option<DishId> {
        self.decisions.last().map(Decision::winner)
    }

    /// Returns the creation time.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
