//! SeaORM adapter for the game_squads and game_operators join tables.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use time::OffsetDateTime;

use crate::entities::{game_operators, game_squads, games, operators, squads};

pub async fn find_game_squad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    squad_id: i64,
) -> Result<Option<game_squads::Model>, sea_orm::DbErr> {
    game_squads::Entity::find()
        .filter(game_squads::Column::GameId.eq(game_id))
        .filter(game_squads::Column::SquadId.eq(squad_id))
        .one(conn)
        .await
}

pub async fn insert_game_squad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    squad_id: i64,
) -> Result<game_squads::Model, sea_orm::DbErr> {
    game_squads::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        squad_id: Set(squad_id),
        joined_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}

/// Returns the number of rows removed (0 or 1).
pub async fn delete_game_squad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    squad_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = game_squads::Entity::delete_many()
        .filter(game_squads::Column::GameId.eq(game_id))
        .filter(game_squads::Column::SquadId.eq(squad_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn count_game_squads<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    use sea_orm::PaginatorTrait;

    game_squads::Entity::find()
        .filter(game_squads::Column::GameId.eq(game_id))
        .count(conn)
        .await
}

/// Join rows for a game with their squads, in join order.
pub async fn list_game_squads<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<(game_squads::Model, Option<squads::Model>)>, sea_orm::DbErr> {
    game_squads::Entity::find()
        .filter(game_squads::Column::GameId.eq(game_id))
        .find_also_related(squads::Entity)
        .order_by_asc(game_squads::Column::JoinedAt)
        .order_by_asc(game_squads::Column::Id)
        .all(conn)
        .await
}

pub async fn find_game_operator<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    operator_id: i64,
) -> Result<Option<game_operators::Model>, sea_orm::DbErr> {
    game_operators::Entity::find()
        .filter(game_operators::Column::GameId.eq(game_id))
        .filter(game_operators::Column::OperatorId.eq(operator_id))
        .one(conn)
        .await
}

pub async fn insert_game_operator<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    operator_id: i64,
) -> Result<game_operators::Model, sea_orm::DbErr> {
    game_operators::ActiveModel {
        id: NotSet,
        game_id: Set(game_id),
        operator_id: Set(operator_id),
        joined_at: Set(OffsetDateTime::now_utc()),
    }
    .insert(conn)
    .await
}

pub async fn delete_game_operator<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    operator_id: i64,
) -> Result<u64, sea_orm::DbErr> {
    let result = game_operators::Entity::delete_many()
        .filter(game_operators::Column::GameId.eq(game_id))
        .filter(game_operators::Column::OperatorId.eq(operator_id))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}

pub async fn list_game_operators<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<(game_operators::Model, Option<operators::Model>)>, sea_orm::DbErr> {
    game_operators::Entity::find()
        .filter(game_operators::Column::GameId.eq(game_id))
        .find_also_related(operators::Entity)
        .order_by_asc(game_operators::Column::JoinedAt)
        .order_by_asc(game_operators::Column::Id)
        .all(conn)
        .await
}

/// A squad's most recent games by start date.
pub async fn list_squad_games<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
    limit: u64,
) -> Result<Vec<(game_squads::Model, Option<games::Model>)>, sea_orm::DbErr> {
    game_squads::Entity::find()
        .filter(game_squads::Column::SquadId.eq(squad_id))
        .find_also_related(games::Entity)
        .order_by_desc(games::Column::StartDate)
        .order_by_desc(game_squads::Column::Id)
        .limit(limit)
        .all(conn)
        .await
}
