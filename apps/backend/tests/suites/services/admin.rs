// Back-office dashboard and primary-admin operations.
//
// The primary admin is the lowest-id active ADMIN visible to the
// transaction, so each test seeds its admins in id order before acting.

use milsim_backend::adapters::operators_sea::{self, OperatorFilter};
use milsim_backend::db::require_db;
use milsim_backend::db::txn::SharedTxn;
use milsim_backend::domain::actor::Actor;
use milsim_backend::domain::pagination::PageRequest;
use milsim_backend::entities::operators::{self, Role};
use milsim_backend::errors::domain::{ConflictKind, DomainError, ForbiddenKind, ValidationKind};
use milsim_backend::repos::operators as operators_repo;
use milsim_backend::services::admin::AdminService;
use milsim_backend::services::enrollment::EnrollmentService;
use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::support::build_test_state;
use crate::support::factory::{seed_open_game, seed_operator, seed_payment, seed_squad};

/// Seeds an admin that is guaranteed to be primary by deactivating every
/// other visible admin first.
async fn seed_primary_admin(
    conn: &(impl ConnectionTrait + Send + Sync),
) -> Result<operators::Model, Box<dyn std::error::Error>> {
    let admin = seed_operator(conn, Role::Admin).await?;
    while let Some(id) = operators_sea::first_active_admin_id(conn).await? {
        if id == admin.id {
            break;
        }
        operators_sea::set_active(conn, id, false).await?;
    }
    Ok(admin)
}

fn actor(model: &operators::Model) -> Actor {
    Actor::new(model.id, model.role)
}

#[tokio::test]
async fn test_only_primary_admin_mutates() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = AdminService::new();

    let primary = seed_primary_admin(txn).await?;
    let deputy = seed_operator(txn, Role::Admin).await?;
    let player = seed_operator(txn, Role::Player).await?;

    assert!(service.is_first_admin(txn, actor(&primary)).await?);
    assert!(!service.is_first_admin(txn, actor(&deputy)).await?);

    let err = service
        .change_role(txn, actor(&deputy), player.id, Role::Organizer)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Forbidden(ForbiddenKind::PrimaryAdminRequired, _)
    ));

    let promoted = service
        .change_role(txn, actor(&primary), player.id, Role::Organizer)
        .await?;
    assert_eq!(promoted.role, Role::Organizer);

    let err = service
        .change_role(txn, actor(&primary), primary.id, Role::Player)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::SelfModification, _)
    ));

    let err = service
        .toggle_active(txn, actor(&primary), primary.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::SelfModification, _)
    ));

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_toggles_and_points() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = AdminService::new();

    let primary = seed_primary_admin(txn).await?;
    let player = seed_operator(txn, Role::Player).await?;

    let off = service.toggle_active(txn, actor(&primary), player.id).await?;
    assert!(!off.is_active);
    let on = service.toggle_active(txn, actor(&primary), player.id).await?;
    assert!(on.is_active);

    let verified = service
        .toggle_verified(txn, actor(&primary), player.id)
        .await?;
    assert!(verified.verified);

    let scored = service
        .set_points(txn, actor(&primary), player.id, 340)
        .await?;
    assert_eq!(scored.engagement_score, 340);

    let err = service
        .set_points(txn, actor(&primary), player.id, -1)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Validation(ValidationKind::InvalidField, _)
    ));
    assert_eq!(
        operators_repo::require_operator(txn, player.id)
            .await?
            .engagement_score,
        340
    );

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_stats_and_listings() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = AdminService::new();

    let before = service.stats(txn, OffsetDateTime::now_utc()).await?;

    let organizer = seed_operator(txn, Role::Organizer).await?;
    let retired = seed_operator(txn, Role::Player).await?;
    operators_sea::set_active(txn, retired.id, false).await?;
    let squad = seed_squad(txn, 5).await?;
    let game = seed_open_game(txn, Some(40)).await?;
    EnrollmentService::new()
        .register_squad(txn, game.id, squad.id)
        .await?;
    seed_payment(txn, organizer.id, 60.0).await?;

    let after = service.stats(txn, OffsetDateTime::now_utc()).await?;
    assert_eq!(after.operators_total, before.operators_total + 2);
    assert_eq!(after.operators_active, before.operators_active + 1);
    assert_eq!(after.operators_inactive(), before.operators_inactive() + 1);
    assert_eq!(after.squads_total, before.squads_total + 1);
    assert_eq!(after.games_total, before.games_total + 1);
    assert_eq!(after.payments_total, before.payments_total + 1);
    assert_eq!(after.payments_settled, before.payments_settled);
    assert!(after.next_game.is_some());

    let filter = OperatorFilter {
        search: Some(organizer.nickname.clone()),
        role: Some(Role::Organizer),
    };
    let page = service
        .list_operators(txn, filter, PageRequest::default())
        .await?;
    assert_eq!(page.meta.total, 1);
    assert_eq!(page.data[0].id, organizer.id);

    let squads = service.list_squads(txn, Some(&squad.name)).await?;
    assert_eq!(squads.len(), 1);
    assert!(squads[0].leader.is_none());
    assert!(squads[0].ranking.is_none());

    shared.rollback().await?;
    Ok(())
}
