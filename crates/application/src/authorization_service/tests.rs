use dishpicker_core::AppError;
use dishpicker_domain::{Action, Principal, ResourceKind, Role, Target, UserId};

use super::{AuthorizationService, FORBIDDEN_MESSAGE};

fn regular(id: i64) -> Principal {
    Principal::new(UserId::new(id), Role::User)
}

fn dish_of(owner: i64) -> Target {
    Target::Instance {
        kind: ResourceKind::Dish,
        owner_id: UserId::new(owner),
    }
}

#[test]
fn require_allows_owner_update() {
    let service = AuthorizationService::new();
    assert!(service.require(regular(2), Action::Update, dish_of(2)).is_ok());
}

#[test]
fn require_denies_foreign_delete_with_forbidden_message() {
    let service = AuthorizationService::new();
    let result = service.require(regular(2), Action::Delete, dish_of(5));

    match result {
        Err(AppError::Forbidden(message)) => assert_eq!(message, FORBIDDEN_MESSAGE),
        other => panic!("expected forbidden, got {other:?}"),
    }
}

#[test]
fn collection_read_of_users_is_admin_only() {
    let service = AuthorizationService::new();
    let admin = Principal::new(UserId::new(1), Role::Admin);

    assert!(
        service
            .require_collection(admin, Action::Read, ResourceKind::User)
            .is_ok()
    );
    assert!(
        service
            .require_collection(regular(2), Action::Read, ResourceKind::User)
            .is_err()
    );
}

#[test]
fn require_admin_rejects_regular_users() {
    let service = AuthorizationService::new();

    assert!(
        service
            .require_admin(Principal::new(UserId::new(1), Role::Admin))
            .is_ok()
    );
    assert!(matches!(
        service.require_admin(regular(2)),
        Err(AppError::Forbidden(_))
    ));
}
