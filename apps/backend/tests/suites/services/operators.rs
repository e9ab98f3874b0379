// Operator directory and profile edits.

use milsim_backend::adapters::operators_sea::{self, OperatorUpdate};
use milsim_backend::db::require_db;
use milsim_backend::db::txn::SharedTxn;
use milsim_backend::domain::actor::Actor;
use milsim_backend::entities::operators::Role;
use milsim_backend::errors::domain::{ConflictKind, DomainError, ForbiddenKind, NotFoundKind};
use milsim_backend::repos::operators;
use milsim_backend::services::operators::OperatorService;

use crate::support::build_test_state;
use crate::support::factory::{seed_led_squad, seed_operator};

#[tokio::test]
async fn test_profile_lists_squads_and_hides_inactive() -> Result<(), Box<dyn std::error::Error>>
{
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = OperatorService::new();

    let leader = seed_operator(txn, Role::SquadLeader).await?;
    let squad = seed_led_squad(txn, leader.id).await?;

    let profile = service.get_operator(txn, leader.id).await?;
    assert_eq!(profile.operator.id, leader.id);
    assert_eq!(profile.squads.len(), 1);
    assert_eq!(profile.squads[0].squad_id, squad.id);

    service.deactivate(txn, leader.id).await?;
    let err = service.get_operator(txn, leader.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Operator, _)));

    // Deactivating twice reports the operator as gone.
    let err = service.deactivate(txn, leader.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Operator, _)));

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_search_matches_nickname_case_insensitively(
) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = OperatorService::new();

    let target = seed_operator(txn, Role::Player).await?;
    let retired = seed_operator(txn, Role::Player).await?;
    operators_sea::set_active(txn, retired.id, false).await?;

    let found = service.search(txn, &target.nickname.to_uppercase()).await?;
    assert!(found.iter().any(|o| o.id == target.id));

    let found = service.search(txn, &retired.nickname).await?;
    assert!(found.is_empty());

    assert!(service.search(txn, "   ").await?.is_empty());

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_update_rules() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = OperatorService::new();

    let player = seed_operator(txn, Role::Player).await?;
    let other = seed_operator(txn, Role::Player).await?;
    let organizer = seed_operator(txn, Role::Organizer).await?;
    let admin = seed_operator(txn, Role::Admin).await?;

    let patch = OperatorUpdate {
        full_name: Some("Carla Mendes".into()),
        phone: Some("+55 11 98888-7777".into()),
        ..Default::default()
    };
    let updated = service
        .update_operator(txn, Actor::new(player.id, player.role), player.id, patch.clone())
        .await?;
    assert_eq!(updated.full_name.as_deref(), Some("Carla Mendes"));

    // Organizers are not admins.
    let err = service
        .update_operator(
            txn,
            Actor::new(organizer.id, organizer.role),
            player.id,
            patch.clone(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Forbidden(ForbiddenKind::NotOwner, _)));

    let renamed = service
        .update_operator(
            txn,
            Actor::new(admin.id, admin.role),
            player.id,
            OperatorUpdate {
                nickname: Some(format!("  {}x  ", player.nickname)),
                ..Default::default()
            },
        )
        .await?;
    assert_eq!(renamed.nickname, format!("{}x", player.nickname));

    let err = service
        .update_operator(
            txn,
            Actor::new(player.id, player.role),
            player.id,
            OperatorUpdate {
                nickname: Some(other.nickname.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::UniqueNickname, _)
    ));
    assert_eq!(
        operators::require_operator(txn, player.id).await?.nickname,
        renamed.nickname
    );

    shared.rollback().await?;
    Ok(())
}
