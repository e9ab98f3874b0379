//! Row seeding for integration tests. Names go through `unique_str` so rows
//! from concurrent tests never collide on unique columns.

use backend_test_support::unique_helpers::{unique_email, unique_str};
use milsim_backend::adapters::games_sea::{self, GameCreate, GameUpdate};
use milsim_backend::adapters::operators_sea::{self, OperatorCreate};
use milsim_backend::adapters::payments_sea::{self, PaymentCreate};
use milsim_backend::adapters::rankings_sea::{self, RankingCreate};
use milsim_backend::adapters::squad_members_sea;
use milsim_backend::adapters::squads_sea::{self, SquadCreate};
use milsim_backend::entities::games::{self, GameStatus};
use milsim_backend::entities::operators::{self, Role};
use milsim_backend::entities::payments::{self, PaymentMethod};
use milsim_backend::entities::{rankings, squads};
use sea_orm::{ConnectionTrait, DbErr};
use time::{Duration, OffsetDateTime};

/// A game two weeks out, moved to `status` after creation.
pub async fn seed_game(
    conn: &(impl ConnectionTrait + Send + Sync),
    max_players: Option<i32>,
    status: GameStatus,
) -> Result<games::Model, DbErr> {
    let start = OffsetDateTime::now_utc() + Duration::days(14);
    let mut dto = GameCreate::new(unique_str("game"), start).with_location("Fort Range 3");
    if let Some(max) = max_players {
        dto = dto.with_max_players(max);
    }
    let game = games_sea::create_game(conn, dto).await?;

    if status == GameStatus::Scheduled {
        return Ok(game);
    }
    games_sea::update_game(conn, game.id, GameUpdate::new().with_status(status)).await
}

/// An open game, the usual starting point for enrollment tests.
pub async fn seed_open_game(
    conn: &(impl ConnectionTrait + Send + Sync),
    max_players: Option<i32>,
) -> Result<games::Model, DbErr> {
    seed_game(conn, max_players, GameStatus::RegistrationOpen).await
}

pub async fn seed_squad(
    conn: &(impl ConnectionTrait + Send + Sync),
    total_members: i32,
) -> Result<squads::Model, DbErr> {
    squads_sea::create_squad(
        conn,
        SquadCreate::new(unique_str("squad"), total_members).with_tag("TST"),
    )
    .await
}

pub async fn seed_operator(
    conn: &(impl ConnectionTrait + Send + Sync),
    role: Role,
) -> Result<operators::Model, DbErr> {
    operators_sea::create_operator(
        conn,
        OperatorCreate::new(unique_str("op"), unique_email("op")).with_role(role),
    )
    .await
}

/// A squad plus an active ranking carrying the given season record.
pub async fn seed_ranked_squad(
    conn: &(impl ConnectionTrait + Send + Sync),
    total_points: i32,
    record: (i32, i32, i32),
    total_eliminations: i32,
) -> Result<(squads::Model, rankings::Model), DbErr> {
    let squad = seed_squad(conn, 6).await?;
    let (played, won, lost) = record;
    let ranking = rankings_sea::create_ranking(
        conn,
        RankingCreate::new(squad.id)
            .with_points(total_points)
            .with_record(played, won, lost)
            .with_eliminations(total_eliminations),
    )
    .await?;
    Ok((squad, ranking))
}

/// A one-member squad led by `leader_id`, with the leader's membership row.
pub async fn seed_led_squad(
    conn: &(impl ConnectionTrait + Send + Sync),
    leader_id: i64,
) -> Result<squads::Model, DbErr> {
    let squad = squads_sea::create_squad(
        conn,
        SquadCreate::new(unique_str("squad"), 1)
            .with_tag("LED")
            .with_leader(leader_id),
    )
    .await?;
    squad_members_sea::insert(conn, squad.id, leader_id).await?;
    Ok(squad)
}

/// A PENDING payment with no game attached.
pub async fn seed_payment(
    conn: &(impl ConnectionTrait + Send + Sync),
    operator_id: i64,
    amount: f64,
) -> Result<payments::Model, DbErr> {
    payments_sea::create_payment(
        conn,
        PaymentCreate::new(operator_id, amount, PaymentMethod::Pix),
    )
    .await
}
