//! SeaORM adapter for games - generic over ConnectionTrait.

use sea_orm::sea_query::{Condition, Expr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::games::{self, GameStatus};

pub mod dto;

pub use dto::{GameCreate, GameUpdate};

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find_by_id(game_id).one(conn).await
}

pub async fn find_active_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find_by_id(game_id)
        .filter(games::Column::IsActive.eq(true))
        .one(conn)
        .await
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = OffsetDateTime::now_utc();
    let game_active = games::ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        description: Set(dto.description),
        location: Set(dto.location),
        start_date: Set(dto.start_date),
        end_date: Set(dto.end_date),
        game_type: Set(dto.game_type),
        status: Set(GameStatus::Scheduled),
        max_players: Set(dto.max_players),
        current_players: Set(0),
        registration_fee: Set(dto.registration_fee),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    game_active.insert(conn).await
}

/// Apply a partial update and return the refreshed row.
pub async fn update_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    dto: GameUpdate,
) -> Result<games::Model, sea_orm::DbErr> {
    let mut game: games::ActiveModel = games::Entity::find_by_id(game_id)
        .one(conn)
        .await?
        .ok_or_else(|| sea_orm::DbErr::RecordNotFound("Game not found".to_string()))?
        .into();

    if let Some(name) = dto.name {
        game.name = Set(name);
    }
    if let Some(description) = dto.description {
        game.description = Set(description);
    }
    if let Some(location) = dto.location {
        game.location = Set(location);
    }
    if let Some(start_date) = dto.start_date {
        game.start_date = Set(start_date);
    }
    if let Some(end_date) = dto.end_date {
        game.end_date = Set(end_date);
    }
    if let Some(game_type) = dto.game_type {
        game.game_type = Set(game_type);
    }
    if let Some(status) = dto.status {
        game.status = Set(status);
    }
    if let Some(max_players) = dto.max_players {
        game.max_players = Set(max_players);
    }
    if let Some(fee) = dto.registration_fee {
        game.registration_fee = Set(fee);
    }
    game.updated_at = Set(OffsetDateTime::now_utc());

    game.update(conn).await
}

/// One page of active games, newest start date first, plus the total count.
pub async fn list_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    status: Option<GameStatus>,
    offset: u64,
    limit: u64,
) -> Result<(Vec<games::Model>, u64), sea_orm::DbErr> {
    let mut query = games::Entity::find().filter(games::Column::IsActive.eq(true));
    if let Some(status) = status {
        query = query.filter(games::Column::Status.eq(status));
    }

    let total = query.clone().count(conn).await?;
    let rows = query
        .order_by_desc(games::Column::StartDate)
        .order_by_desc(games::Column::Id)
        .offset(offset)
        .limit(limit)
        .all(conn)
        .await?;

    Ok((rows, total))
}

/// Add `amount` to `current_players` only if the result stays within
/// `max_players` (or the game is unbounded).
///
/// Single statement; returns false when the guard rejected the update or the
/// game does not exist.
pub async fn try_increment_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    amount: i32,
) -> Result<bool, sea_orm::DbErr> {
    let result = games::Entity::update_many()
        .col_expr(
            games::Column::CurrentPlayers,
            Expr::col(games::Column::CurrentPlayers).add(amount),
        )
        .col_expr(
            games::Column::UpdatedAt,
            Expr::val(OffsetDateTime::now_utc()).into(),
        )
        .filter(games::Column::Id.eq(game_id))
        .filter(
            Condition::any()
                .add(games::Column::MaxPlayers.is_null())
                .add(
                    Expr::expr(Expr::col(games::Column::CurrentPlayers).add(amount))
                        .lte(Expr::col(games::Column::MaxPlayers)),
                ),
        )
        .exec(conn)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Subtract `amount` from `current_players`. Not clamped.
pub async fn decrement_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    amount: i32,
) -> Result<(), sea_orm::DbErr> {
    let result = games::Entity::update_many()
        .col_expr(
            games::Column::CurrentPlayers,
            Expr::col(games::Column::CurrentPlayers).sub(amount),
        )
        .col_expr(
            games::Column::UpdatedAt,
            Expr::val(OffsetDateTime::now_utc()).into(),
        )
        .filter(games::Column::Id.eq(game_id))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        return Err(sea_orm::DbErr::RecordNotFound("Game not found".to_string()));
    }
    Ok(())
}

/// The earliest active game starting at or after `now`.
pub async fn next_upcoming<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    now: OffsetDateTime,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find()
        .filter(games::Column::IsActive.eq(true))
        .filter(games::Column::StartDate.gte(now))
        .order_by_asc(games::Column::StartDate)
        .order_by_asc(games::Column::Id)
        .one(conn)
        .await
}

pub async fn count_all<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, sea_orm::DbErr> {
    games::Entity::find().count(conn).await
}
