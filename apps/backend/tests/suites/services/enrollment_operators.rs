// Individual operator enrollment: one seat per operator.

use milsim_backend::adapters::games_sea;
use milsim_backend::db::require_db;
use milsim_backend::db::txn::SharedTxn;
use milsim_backend::entities::games::GameStatus;
use milsim_backend::entities::operators::Role;
use milsim_backend::errors::domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
use milsim_backend::repos::enrollments;
use milsim_backend::services::enrollment::EnrollmentService;
use milsim_backend::services::games::GameService;

use crate::support::build_test_state;
use crate::support::factory::{seed_game, seed_open_game, seed_operator, seed_squad};

#[tokio::test]
async fn test_operator_takes_one_seat() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = EnrollmentService::new();

    let game = seed_open_game(txn, Some(2)).await?;
    let first = seed_operator(txn, Role::Player).await?;
    let second = seed_operator(txn, Role::SquadLeader).await?;
    let third = seed_operator(txn, Role::Player).await?;

    service.register_operator(txn, game.id, first.id).await?;
    service.register_operator(txn, game.id, second.id).await?;
    let err = service
        .register_operator(txn, game.id, third.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::CapacityExceeded, _)
    ));

    let game = games_sea::find_by_id(txn, game.id).await?.unwrap();
    assert_eq!(game.current_players, 2);

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_squads_and_operators_share_capacity() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = EnrollmentService::new();

    let game = seed_open_game(txn, Some(5)).await?;
    let squad = seed_squad(txn, 5).await?;
    let operator = seed_operator(txn, Role::Player).await?;

    service.register_squad(txn, game.id, squad.id).await?;
    let err = service
        .register_operator(txn, game.id, operator.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::CapacityExceeded, _)
    ));

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_operator_duplicate_and_missing() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = EnrollmentService::new();

    let game = seed_open_game(txn, None).await?;
    let operator = seed_operator(txn, Role::Player).await?;

    service.register_operator(txn, game.id, operator.id).await?;
    let err = service
        .register_operator(txn, game.id, operator.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::AlreadyRegistered, _)
    ));

    let err = service
        .register_operator(txn, game.id, 9_999_999)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound(NotFoundKind::Operator, _)
    ));

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_operator_closed_game_and_unregister() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = EnrollmentService::new();
    let operator = seed_operator(txn, Role::Player).await?;

    let closed = seed_game(txn, None, GameStatus::InProgress).await?;
    let err = service
        .register_operator(txn, closed.id, operator.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::RegistrationClosed, _)
    ));

    let open = seed_open_game(txn, Some(10)).await?;
    service.register_operator(txn, open.id, operator.id).await?;
    let listed = GameService::new().list_game_operators(txn, open.id).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].operator_id, operator.id);
    assert_eq!(listed[0].nickname, operator.nickname);

    service.unregister_operator(txn, open.id, operator.id).await?;
    assert!(!enrollments::operator_registered(txn, open.id, operator.id).await?);
    assert_eq!(
        games_sea::find_by_id(txn, open.id).await?.unwrap().current_players,
        0
    );

    let err = service
        .unregister_operator(txn, open.id, operator.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound(NotFoundKind::Registration, _)
    ));

    shared.rollback().await?;
    Ok(())
}
