// Squad creation, membership and join requests against a live schema.

use backend_test_support::unique_helpers::unique_str;
use milsim_backend::adapters::squads_sea::SquadUpdate;
use milsim_backend::db::require_db;
use milsim_backend::db::txn::SharedTxn;
use milsim_backend::domain::actor::Actor;
use milsim_backend::entities::join_requests::JoinRequestStatus;
use milsim_backend::entities::operators::Role;
use milsim_backend::entities::squads::Specialty;
use milsim_backend::errors::domain::{ConflictKind, DomainError, ForbiddenKind, NotFoundKind};
use milsim_backend::repos::{memberships, operators, squads};
use milsim_backend::services::squads::{NewSquad, SquadService};

use crate::support::build_test_state;
use crate::support::factory::{seed_led_squad, seed_operator};

fn actor(model: &milsim_backend::entities::operators::Model) -> Actor {
    Actor::new(model.id, model.role)
}

#[tokio::test]
async fn test_create_squad_seeds_members_and_promotes_leader(
) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = SquadService::new();

    let leader = seed_operator(txn, Role::Player).await?;
    let rifleman = seed_operator(txn, Role::Player).await?;
    let medic = seed_operator(txn, Role::Player).await?;

    let input = NewSquad {
        name: unique_str("wolves"),
        tag: Some("WLF".into()),
        specialty: Some(Specialty::Reconhecimento),
        state: Some("SP".into()),
        // Duplicates and the leader's own id are ignored.
        member_ids: vec![rifleman.id, medic.id, rifleman.id, leader.id],
        ..Default::default()
    };
    let squad = service.create_squad(txn, actor(&leader), input).await?;

    assert_eq!(squad.total_members, 3);
    assert_eq!(squad.leader_id, Some(leader.id));
    assert_eq!(squad.specialty, Specialty::Reconhecimento);
    assert_eq!(memberships::list_members(txn, squad.id).await?.len(), 3);
    assert_eq!(
        operators::require_operator(txn, leader.id).await?.role,
        Role::SquadLeader
    );

    let detail = service.get_squad(txn, squad.id).await?;
    assert_eq!(detail.members.len(), 3);
    assert!(detail.ranking.is_none());
    assert!(detail.recent_games.is_empty());

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_create_squad_rejections_leave_nothing_behind(
) -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = SquadService::new();

    let leader = seed_operator(txn, Role::Player).await?;
    let name = unique_str("ghosts");

    // Unknown member id.
    let err = service
        .create_squad(
            txn,
            actor(&leader),
            NewSquad {
                name: name.clone(),
                member_ids: vec![i64::MAX],
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Operator, _)));
    assert!(!squads::name_taken(txn, &name).await?);
    assert_eq!(
        operators::require_operator(txn, leader.id).await?.role,
        Role::Player
    );

    service
        .create_squad(
            txn,
            actor(&leader),
            NewSquad {
                name: name.clone(),
                ..Default::default()
            },
        )
        .await?;

    // Same leader, second squad.
    let err = service
        .create_squad(
            txn,
            actor(&leader),
            NewSquad {
                name: unique_str("ghosts"),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::AlreadyLeadsSquad, _)
    ));

    // Same name, other leader.
    let other = seed_operator(txn, Role::Player).await?;
    let err = service
        .create_squad(
            txn,
            actor(&other),
            NewSquad {
                name,
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::UniqueSquadName, _)
    ));

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_only_the_leader_edits_and_adds() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = SquadService::new();

    let leader = seed_operator(txn, Role::SquadLeader).await?;
    let outsider = seed_operator(txn, Role::Admin).await?;
    let recruit = seed_operator(txn, Role::Player).await?;
    let squad = seed_led_squad(txn, leader.id).await?;

    let patch = SquadUpdate {
        description: Some("Night operations".into()),
        ..Default::default()
    };
    let err = service
        .update_squad(txn, actor(&outsider), squad.id, patch.clone())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Forbidden(ForbiddenKind::NotSquadLeader, _)
    ));
    let updated = service
        .update_squad(txn, actor(&leader), squad.id, patch)
        .await?;
    assert_eq!(updated.description.as_deref(), Some("Night operations"));

    let err = service
        .add_member(txn, actor(&outsider), squad.id, recruit.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Forbidden(ForbiddenKind::NotSquadLeader, _)
    ));

    service
        .add_member(txn, actor(&leader), squad.id, recruit.id)
        .await?;
    assert_eq!(squads::require_squad(txn, squad.id).await?.total_members, 2);

    let err = service
        .add_member(txn, actor(&leader), squad.id, recruit.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::AlreadyMember, _)
    ));
    assert_eq!(squads::require_squad(txn, squad.id).await?.total_members, 2);

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_remove_member_rules() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = SquadService::new();

    let leader = seed_operator(txn, Role::SquadLeader).await?;
    let alpha = seed_operator(txn, Role::Player).await?;
    let bravo = seed_operator(txn, Role::Player).await?;
    let squad = seed_led_squad(txn, leader.id).await?;
    service
        .add_member(txn, actor(&leader), squad.id, alpha.id)
        .await?;
    service
        .add_member(txn, actor(&leader), squad.id, bravo.id)
        .await?;

    // A member cannot remove someone else.
    let err = service
        .remove_member(txn, actor(&alpha), squad.id, bravo.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Forbidden(ForbiddenKind::NotSquadLeader, _)
    ));

    // But may leave.
    service
        .remove_member(txn, actor(&alpha), squad.id, alpha.id)
        .await?;
    service
        .remove_member(txn, actor(&leader), squad.id, bravo.id)
        .await?;
    assert_eq!(squads::require_squad(txn, squad.id).await?.total_members, 1);

    let err = service
        .remove_member(txn, actor(&leader), squad.id, bravo.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound(NotFoundKind::Membership, _)
    ));

    let err = service
        .remove_member(txn, actor(&leader), squad.id, leader.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::LeaderCannotLeave, _)
    ));
    assert_eq!(squads::require_squad(txn, squad.id).await?.total_members, 1);

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_join_request_lifecycle() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = SquadService::new();

    let leader = seed_operator(txn, Role::SquadLeader).await?;
    let applicant = seed_operator(txn, Role::Player).await?;
    let squad = seed_led_squad(txn, leader.id).await?;

    let request = service
        .request_join(txn, actor(&applicant), squad.id)
        .await?;
    assert_eq!(request.status, JoinRequestStatus::Pending);

    let err = service
        .request_join(txn, actor(&applicant), squad.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::JoinRequestPending, _)
    ));

    let err = service
        .list_join_requests(txn, actor(&applicant), squad.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Forbidden(ForbiddenKind::NotSquadLeader, _)
    ));
    let pending = service
        .list_join_requests(txn, actor(&leader), squad.id)
        .await?;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].nickname, applicant.nickname);

    // Rejected, then asked again: the same row is reopened.
    service
        .respond_join_request(txn, actor(&leader), request.id, false)
        .await?;
    let reopened = service
        .request_join(txn, actor(&applicant), squad.id)
        .await?;
    assert_eq!(reopened.id, request.id);
    assert_eq!(reopened.status, JoinRequestStatus::Pending);

    let accepted = service
        .respond_join_request(txn, actor(&leader), request.id, true)
        .await?;
    assert_eq!(accepted.status, JoinRequestStatus::Accepted);
    assert!(memberships::is_member(txn, squad.id, applicant.id).await?);
    assert_eq!(squads::require_squad(txn, squad.id).await?.total_members, 2);

    let err = service
        .respond_join_request(txn, actor(&leader), request.id, true)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::JoinRequestProcessed, _)
    ));

    let err = service
        .request_join(txn, actor(&applicant), squad.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::Conflict(ConflictKind::AlreadyMember, _)
    ));

    let err = service
        .respond_join_request(txn, actor(&leader), i64::MAX, true)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DomainError::NotFound(NotFoundKind::JoinRequest, _)
    ));

    shared.rollback().await?;
    Ok(())
}
