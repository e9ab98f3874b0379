// Payment records and their status changes.

use milsim_backend::db::require_db;
use milsim_backend::db::txn::SharedTxn;
use milsim_backend::domain::actor::Actor;
use milsim_backend::domain::pagination::PageRequest;
use milsim_backend::entities::operators::Role;
use milsim_backend::entities::payments::{PaymentMethod, PaymentStatus};
use milsim_backend::errors::domain::{DomainError, ForbiddenKind, NotFoundKind, ValidationKind};
use milsim_backend::services::payments::{NewPayment, PaymentService};

use crate::support::build_test_state;
use crate::support::factory::{seed_open_game, seed_operator, seed_payment};

#[tokio::test]
async fn test_create_for_self_and_by_staff() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = PaymentService::new();

    let player = seed_operator(txn, Role::Player).await?;
    let other = seed_operator(txn, Role::Player).await?;
    let organizer = seed_operator(txn, Role::Organizer).await?;
    let game = seed_open_game(txn, None).await?;

    let input = NewPayment {
        operator_id: player.id,
        game_id: Some(game.id),
        amount: 120.0,
        method: PaymentMethod::Pix,
    };
    let payment = service
        .create_payment(txn, Actor::new(player.id, player.role), input.clone())
        .await?;
    assert_eq!(payment.status, PaymentStatus::Pending);
    assert_eq!(payment.game_id, Some(game.id));
    assert!(payment.paid_at.is_none());

    let err = service
        .create_payment(txn, Actor::new(other.id, other.role), input.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::NotOwner, _)));

    service
        .create_payment(txn, Actor::new(organizer.id, organizer.role), input.clone())
        .await?;

    let err = service
        .create_payment(
            txn,
            Actor::new(player.id, player.role),
            NewPayment {
                amount: 0.0,
                ..input.clone()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidField, _)
    ));

    let err = service
        .create_payment(
            txn,
            Actor::new(player.id, player.role),
            NewPayment {
                game_id: Some(i64::MAX),
                ..input
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Game, _)));

    let mine = service
        .list_for_operator(txn, Actor::new(player.id, player.role), player.id)
        .await?;
    assert_eq!(mine.len(), 2);

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_status_changes_stamp_paid_at() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = PaymentService::new();

    let player = seed_operator(txn, Role::Player).await?;
    let admin = seed_operator(txn, Role::Admin).await?;
    let payment = seed_payment(txn, player.id, 80.0).await?;
    let staff = Actor::new(admin.id, admin.role);

    let err = service
        .update_status(
            txn,
            Actor::new(player.id, player.role),
            payment.id,
            PaymentStatus::Confirmed,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(_, _)));

    let confirmed = service
        .update_status(txn, staff, payment.id, PaymentStatus::Confirmed)
        .await?;
    let paid_at = confirmed.paid_at.expect("confirmed payment should be stamped");

    let received = service
        .update_status(txn, staff, payment.id, PaymentStatus::Received)
        .await?;
    assert_eq!(received.paid_at, Some(paid_at));

    let refunded = service
        .update_status(txn, staff, payment.id, PaymentStatus::Refunded)
        .await?;
    assert!(refunded.paid_at.is_none());

    // Owners read their own payments; strangers do not.
    let stranger = seed_operator(txn, Role::SquadLeader).await?;
    service
        .get_payment(txn, Actor::new(player.id, player.role), payment.id)
        .await?;
    let err = service
        .get_payment(txn, Actor::new(stranger.id, stranger.role), payment.id)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::NotOwner, _)));

    let err = service
        .get_payment(txn, staff, i64::MAX)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Payment, _)));

    let page = service
        .list_payments(txn, staff, PageRequest::default())
        .await?;
    assert!(page.data.iter().any(|p| p.id == payment.id));

    shared.rollback().await?;
    Ok(())
}
