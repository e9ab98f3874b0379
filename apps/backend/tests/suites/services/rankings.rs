// Ranking recalculation and leaderboard reads.

use milsim_backend::adapters::rankings_sea::{self, RankingCreate};
use milsim_backend::db::require_db;
use milsim_backend::db::txn::SharedTxn;
use milsim_backend::domain::pagination::PageRequest;
use milsim_backend::errors::domain::{DomainError, InfraErrorKind, NotFoundKind};
use milsim_backend::repos::rankings;
use milsim_backend::services::rankings::RankingService;
use sea_orm::{ConnectionTrait, DbBackend};

use crate::support::build_test_state;
use crate::support::factory::{seed_ranked_squad, seed_squad};

#[tokio::test]
async fn test_recalculate_two_squads() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();

    // Y is inserted first so position cannot come from insertion order.
    let (_, y) = seed_ranked_squad(txn, 100, (2, 1, 1), 22).await?;
    let (_, x) = seed_ranked_squad(txn, 150, (3, 2, 1), 45).await?;

    let processed = RankingService::new().recalculate(txn).await?;
    assert_eq!(processed, 2);

    let x = rankings::find_by_id(txn, x.id).await?.unwrap();
    let y = rankings::find_by_id(txn, y.id).await?.unwrap();
    assert_eq!(x.position, 1);
    assert_eq!(x.win_rate, 66.67);
    assert_eq!(x.average_eliminations_per_game, 15.0);
    assert_eq!(y.position, 2);
    assert_eq!(y.win_rate, 50.0);
    assert_eq!(y.average_eliminations_per_game, 11.0);

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_recalculate_zero_games_and_empty_table() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = RankingService::new();

    assert_eq!(service.recalculate(txn).await?, 0);

    let (_, fresh) = seed_ranked_squad(txn, 0, (0, 0, 0), 0).await?;
    assert_eq!(service.recalculate(txn).await?, 1);

    let fresh = rankings::find_by_id(txn, fresh.id).await?.unwrap();
    assert_eq!(fresh.position, 1);
    assert_eq!(fresh.win_rate, 0.0);
    assert_eq!(fresh.average_eliminations_per_game, 0.0);

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_inactive_rankings_are_left_alone() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();

    let (_, active) = seed_ranked_squad(txn, 10, (1, 0, 1), 3).await?;
    let retired_squad = seed_squad(txn, 4).await?;
    let retired = rankings_sea::create_ranking(
        txn,
        RankingCreate::new(retired_squad.id)
            .with_points(500)
            .with_record(10, 10, 0)
            .inactive(),
    )
    .await?;

    let processed = RankingService::new().recalculate(txn).await?;
    assert_eq!(processed, 1);

    let active = rankings::find_by_id(txn, active.id).await?.unwrap();
    assert_eq!(active.position, 1);

    let retired = rankings::find_by_id(txn, retired.id).await?.unwrap();
    assert_eq!(retired.position, 0);
    assert_eq!(retired.win_rate, 0.0);

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_equal_points_break_on_wins() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();

    let (_, fewer_wins) = seed_ranked_squad(txn, 90, (4, 1, 3), 10).await?;
    let (_, more_wins) = seed_ranked_squad(txn, 90, (4, 3, 1), 10).await?;

    RankingService::new().recalculate(txn).await?;

    let more_wins = rankings::find_by_id(txn, more_wins.id).await?.unwrap();
    let fewer_wins = rankings::find_by_id(txn, fewer_wins.id).await?.unwrap();
    assert_eq!(more_wins.position, 1);
    assert_eq!(fewer_wins.position, 2);

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_leaderboard_pages_and_squad_lookup() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    let service = RankingService::new();

    let (third, _) = seed_ranked_squad(txn, 10, (2, 0, 2), 4).await?;
    let (first, _) = seed_ranked_squad(txn, 30, (2, 2, 0), 9).await?;
    let (second, _) = seed_ranked_squad(txn, 20, (2, 1, 1), 6).await?;
    service.recalculate(txn).await?;

    let page = service
        .leaderboard(txn, PageRequest::new(Some(1), Some(2))?)
        .await?;
    assert_eq!(page.meta.total, 3);
    assert_eq!(page.meta.total_pages, 2);
    let squads: Vec<i64> = page.data.iter().map(|e| e.ranking.squad_id).collect();
    assert_eq!(squads, vec![first.id, second.id]);
    assert_eq!(page.data[0].squad_name, first.name);

    let page = service
        .leaderboard(txn, PageRequest::new(Some(2), Some(2))?)
        .await?;
    assert_eq!(page.data.len(), 1);
    assert_eq!(page.data[0].ranking.squad_id, third.id);
    assert_eq!(page.data[0].ranking.position, 3);

    let entry = service.squad_ranking(txn, second.id).await?;
    assert_eq!(entry.ranking.position, 2);
    assert_eq!(entry.squad_tag.as_deref(), Some("TST"));

    let unranked = seed_squad(txn, 2).await?;
    let err = service.squad_ranking(txn, unranked.id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(NotFoundKind::Ranking, _)));

    shared.rollback().await?;
    Ok(())
}

#[tokio::test]
async fn test_failed_write_rolls_back_whole_batch() -> Result<(), Box<dyn std::error::Error>> {
    let state = build_test_state().await?;
    let shared = SharedTxn::open(require_db(&state)?).await?;
    let txn = shared.transaction();
    if txn.get_database_backend() != DbBackend::Sqlite {
        shared.rollback().await?;
        return Ok(());
    }

    // Leader is written first, runner-up second.
    let (_, leader) = seed_ranked_squad(txn, 150, (3, 2, 1), 45).await?;
    let (_, runner_up) = seed_ranked_squad(txn, 100, (2, 1, 1), 22).await?;

    txn.execute_unprepared(&format!(
        "CREATE TRIGGER reject_runner_up BEFORE UPDATE ON rankings WHEN NEW.id = {} \
         BEGIN SELECT RAISE(ABORT, 'ranking write rejected'); END",
        runner_up.id
    ))
    .await?;

    let err = RankingService::new().recalculate(txn).await.unwrap_err();
    match err {
        DomainError::Infra(InfraErrorKind::Other(what), _) => assert_eq!(what, "Recalculation"),
        other => panic!("expected recalculation failure, got {other:?}"),
    }

    let leader = rankings::find_by_id(txn, leader.id).await?.unwrap();
    assert_eq!(leader.position, 0);
    assert_eq!(leader.win_rate, 0.0);
    assert_eq!(leader.average_eliminations_per_game, 0.0);

    shared.rollback().await?;
    Ok(())
}
