use std::collections::BTreeSet;
use std::sync::Arc;

use dishpicker_core::AppError;
use dishpicker_domain::{DecisionChoice, DishId, LabelId, Role, UserId};

use crate::test_support::{
    BREAKFAST, DINNER, FakeDecisionTreeRepository, FakeDishRepository, NO_MEAT, dish_service,
    regular, user,
};
use crate::{CreateDishParams, DishService};

use super::{DecisionInput, GameService, NOT_ENOUGH_DISHES_MESSAGE, StartGameParams};

async fn game_with_dishes(count: usize, labels: &[LabelId]) -> (GameService, Vec<DishId>) {
    let repository = Arc::new(FakeDishRepository::with_owners([user(2, Role::User)]));
    let dishes: DishService = dish_service(repository.clone());

    let mut ids = Vec::new();
    for index in 0..count {
        let dish = dishes
            .create_dish(
                regular(2),
                CreateDishParams {
                    name: format!("Dish {index}"),
                    label_ids: labels.to_vec(),
                    dish_type_ids: vec![DINNER],
                    image_path: None,
                },
            )
            .await
            .unwrap_or_else(|error| panic!("create failed: {error}"));
        ids.push(dish.id());
    }

    let service = GameService::new(
        dishes,
        repository,
        Arc::new(FakeDecisionTreeRepository::default()),
    );
    (service, ids)
}

fn decision(position: u32, one: DishId, two: DishId, choice: DecisionChoice) -> DecisionInput {
    DecisionInput {
        position,
        option_one: one,
        option_two: two,
        choice,
    }
}

#[tokio::test]
async fn start_game_draws_two_distinct_dishes_per_round() {
    let (service, ids) = game_with_dishes(10, &[NO_MEAT]).await;

    let game = service
        .start_game(
            regular(2),
            StartGameParams {
                dish_type: DINNER,
                label_ids: vec![NO_MEAT],
                rounds: 3,
            },
        )
        .await
        .unwrap_or_else(|error| panic!("start failed: {error}"));

    let drawn: BTreeSet<DishId> = game.dishes.iter().map(|dish| dish.id()).collect();
    assert_eq!(game.rounds, 3);
    assert_eq!(game.dishes.len(), 6);
    assert_eq!(drawn.len(), 6);
    assert!(drawn.iter().all(|id| ids.contains(id)));
}

#[tokio::test]
async fn start_game_with_too_few_dishes_returns_hint() {
    let (service, _) = game_with_dishes(3, &[]).await;

    let result = service
        .start_game(
            regular(2),
            StartGameParams {
                dish_type: DINNER,
                label_ids: Vec::new(),
                rounds: 2,
            },
        )
        .await;

    match result {
        Err(AppError::Validation(message)) => assert_eq!(message, NOT_ENOUGH_DISHES_MESSAGE),
        other => panic!("expected validation error, got {other:?}"),
    }

    let wrong_type = service
        .start_game(
            regular(2),
            StartGameParams {
                dish_type: BREAKFAST,
                label_ids: Vec::new(),
                rounds: 1,
            },
        )
        .await;
    assert!(matches!(wrong_type, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn start_game_rejects_out_of_range_rounds() {
    let (service, _) = game_with_dishes(2, &[]).await;

    for rounds in [0, -1, 51] {
        let result = service
            .start_game(
                regular(2),
                StartGameParams {
                    dish_type: DINNER,
                    label_ids: Vec::new(),
                    rounds,
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::Validation(_))), "{rounds}");
    }
}

#[tokio::test]
async fn save_decision_tree_persists_valid_game() {
    let (service, ids) = game_with_dishes(3, &[]).await;

    let tree = service
        .save_decision_tree(
            regular(2),
            vec![
                decision(1, ids[1], ids[2], DecisionChoice::OptionTwo),
                decision(0, ids[0], ids[1], DecisionChoice::OptionTwo),
            ],
        )
        .await
        .unwrap_or_else(|error| panic!("save failed: {error}"));

    assert_eq!(tree.size(), 2);
    assert_eq!(tree.owner_id(), UserId::new(2));
    assert_eq!(tree.final_winner(), Some(ids[2]));

    let listed = service.list_decision_trees().await.unwrap_or_default();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn save_decision_tree_rejects_broken_chain_and_unknown_dishes() {
    let (service, ids) = game_with_dishes(3, &[]).await;

    let broken = service
        .save_decision_tree(
            regular(2),
            vec![
                decision(0, ids[0], ids[1], DecisionChoice::OptionOne),
                decision(1, ids[1], ids[2], DecisionChoice::OptionOne),
            ],
        )
        .await;
    assert!(matches!(broken, Err(AppError::Validation(_))));

    let unknown = service
        .save_decision_tree(
            regular(2),
            vec![decision(0, ids[0], DishId::new(404), DecisionChoice::OptionOne)],
        )
        .await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));

    let empty = service.save_decision_tree(regular(2), Vec::new()).await;
    assert!(matches!(empty, Err(AppError::Validation(_))));
}
