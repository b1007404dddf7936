use std::collections::BTreeSet;

use dishpicker_application::{DishChanges, DishRepository, NewDish};
use dishpicker_core::AppError;
use dishpicker_domain::{DishCandidateFilter, DishId, DishName, DishTypeId, LabelId, UserId};
use sqlx::PgPool;

use super::PostgresDishRepository;
use crate::test_database::{
    insert_dish_type, insert_label, insert_user, test_pool, unique_suffix,
};

struct Fixture {
    repository: PostgresDishRepository,
    owner: UserId,
    dish_type: DishTypeId,
    other_type: DishTypeId,
    vegan: LabelId,
    gluten_free: LabelId,
}

async fn fixture(pool: PgPool) -> Fixture {
    Fixture {
        owner: UserId::new(insert_user(&pool, "user").await),
        dish_type: DishTypeId::new(insert_dish_type(&pool).await),
        other_type: DishTypeId::new(insert_dish_type(&pool).await),
        vegan: LabelId::new(insert_label(&pool).await),
        gluten_free: LabelId::new(insert_label(&pool).await),
        repository: PostgresDishRepository::new(pool),
    }
}

async fn create(
    fixture: &Fixture,
    dish_type: DishTypeId,
    labels: Vec<LabelId>,
) -> DishId {
    let dish = fixture
        .repository
        .create(NewDish {
            name: DishName::new(format!("Dish {}", unique_suffix()))
                .unwrap_or_else(|_| panic!("name")),
            owner_id: fixture.owner,
            image_path: None,
            label_ids: labels,
            dish_type_ids: vec![dish_type],
        })
        .await;
    dish.unwrap_or_else(|error| panic!("create failed: {error}"))
        .id()
}

#[tokio::test]
async fn candidate_ids_require_type_and_every_label() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fixture = fixture(pool).await;

    let both = create(&fixture, fixture.dish_type, vec![fixture.vegan, fixture.gluten_free]).await;
    let vegan_only = create(&fixture, fixture.dish_type, vec![fixture.vegan]).await;
    let unlabelled = create(&fixture, fixture.dish_type, Vec::new()).await;
    create(&fixture, fixture.other_type, vec![fixture.vegan]).await;

    let all_of_type: BTreeSet<DishId> = fixture
        .repository
        .candidate_ids(&DishCandidateFilter::new(fixture.dish_type, []))
        .await
        .unwrap_or_default()
        .into_iter()
        .collect();
    assert_eq!(all_of_type, BTreeSet::from([both, vegan_only, unlabelled]));

    let vegan: BTreeSet<DishId> = fixture
        .repository
        .candidate_ids(&DishCandidateFilter::new(fixture.dish_type, [fixture.vegan]))
        .await
        .unwrap_or_default()
        .into_iter()
        .collect();
    assert_eq!(vegan, BTreeSet::from([both, vegan_only]));

    let strict = fixture
        .repository
        .candidate_ids(&DishCandidateFilter::new(
            fixture.dish_type,
            [fixture.vegan, fixture.gluten_free],
        ))
        .await
        .unwrap_or_default();
    assert_eq!(strict, vec![both]);
}

#[tokio::test]
async fn update_with_empty_labels_clears_them() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fixture = fixture(pool).await;
    let dish_id = create(&fixture, fixture.dish_type, vec![fixture.vegan]).await;

    let before = fixture
        .repository
        .find_by_id(dish_id)
        .await
        .ok()
        .flatten()
        .unwrap_or_else(|| panic!("dish should exist"));

    let updated = fixture
        .repository
        .update(
            dish_id,
            DishChanges {
                label_ids: Some(Vec::new()),
                ..DishChanges::default()
            },
        )
        .await
        .unwrap_or_else(|error| panic!("update failed: {error}"));

    assert!(updated.labels().is_empty());
    assert_eq!(updated.dish_types().len(), 1);
    assert_eq!(updated.name(), before.name());
    assert!(updated.last_update_at() >= before.last_update_at());
}

#[tokio::test]
async fn duplicate_name_is_a_conflict() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fixture = fixture(pool).await;
    let name = DishName::new(format!("Dish {}", unique_suffix()))
        .unwrap_or_else(|_| panic!("name"));

    let new_dish = NewDish {
        name,
        owner_id: fixture.owner,
        image_path: Some("images/dish.png".to_owned()),
        label_ids: Vec::new(),
        dish_type_ids: vec![fixture.dish_type],
    };
    assert!(fixture.repository.create(new_dish.clone()).await.is_ok());

    let duplicate = fixture.repository.create(new_dish).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn list_filters_by_owner_and_delete_removes_dish() {
    let Some(pool) = test_pool().await else {
        return;
    };
    let fixture = fixture(pool).await;
    let first = create(&fixture, fixture.dish_type, Vec::new()).await;
    let second = create(&fixture, fixture.dish_type, Vec::new()).await;

    let owned: Vec<DishId> = fixture
        .repository
        .list(Some(fixture.owner))
        .await
        .unwrap_or_default()
        .iter()
        .map(|dish| dish.id())
        .collect();
    assert_eq!(owned, vec![second, first]);

    assert!(fixture.repository.delete(first).await.is_ok());
    assert!(matches!(fixture.repository.find_by_id(first).await, Ok(None)));
    assert!(matches!(
        fixture.repository.delete(first).await,
        Err(AppError::NotFound(_))
    ));
}
