//! Join-row repository for squad and operator enrollment.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::enrollments_sea as enrollments_adapter;
use crate::entities::games::GameStatus;
use crate::entities::operators::Role;
use crate::errors::domain::DomainError;

/// A squad enrolled in a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolledSquad {
    pub squad_id: i64,
    pub name: String,
    pub tag: Option<String>,
    pub total_members: i32,
    pub joined_at: OffsetDateTime,
}

/// An operator enrolled individually in a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolledOperator {
    pub operator_id: i64,
    pub nickname: String,
    pub role: Role,
    pub joined_at: OffsetDateTime,
}

pub async fn squad_registered<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    squad_id: i64,
) -> Result<bool, DomainError> {
    Ok(enrollments_adapter::find_game_squad(conn, game_id, squad_id)
        .await?
        .is_some())
}

pub async fn insert_squad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    squad_id: i64,
) -> Result<(), DomainError> {
    enrollments_adapter::insert_game_squad(conn, game_id, squad_id).await?;
    Ok(())
}

/// True when a join row was removed.
pub async fn delete_squad<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    squad_id: i64,
) -> Result<bool, DomainError> {
    Ok(enrollments_adapter::delete_game_squad(conn, game_id, squad_id).await? > 0)
}

pub async fn count_squads<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<u64, DomainError> {
    Ok(enrollments_adapter::count_game_squads(conn, game_id).await?)
}

pub async fn list_squads<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<EnrolledSquad>, DomainError> {
    let rows = enrollments_adapter::list_game_squads(conn, game_id).await?;
    Ok(rows
        .into_iter()
        .filter_map(|(link, squad)| {
            squad.map(|s| EnrolledSquad {
                squad_id: s.id,
                name: s.name,
                tag: s.tag,
                total_members: s.total_members,
                joined_at: link.joined_at,
            })
        })
        .collect())
}

pub async fn operator_registered<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    operator_id: i64,
) -> Result<bool, DomainError> {
    Ok(
        enrollments_adapter::find_game_operator(conn, game_id, operator_id)
            .await?
            .is_some(),
    )
}

pub async fn insert_operator<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    operator_id: i64,
) -> Result<(), DomainError> {
    enrollments_adapter::insert_game_operator(conn, game_id, operator_id).await?;
    Ok(())
}

pub async fn delete_operator<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    operator_id: i64,
) -> Result<bool, DomainError> {
    Ok(enrollments_adapter::delete_game_operator(conn, game_id, operator_id).await? > 0)
}

pub async fn list_operators<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Vec<EnrolledOperator>, DomainError> {
    let rows = enrollments_adapter::list_game_operators(conn, game_id).await?;
    Ok(rows
        .into_iter()
        .filter_map(|(link, operator)| {
            operator.map(|o| EnrolledOperator {
                operator_id: o.id,
                nickname: o.nickname,
                role: o.role,
                joined_at: link.joined_at,
            })
        })
        .collect())
}

/// A game a squad took part in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquadGame {
    pub game_id: i64,
    pub name: String,
    pub start_date: OffsetDateTime,
    pub status: GameStatus,
}

/// Most recent games first.
pub async fn list_squad_games<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    squad_id: i64,
    limit: u64,
) -> Result<Vec<SquadGame>, DomainError> {
    let rows = enrollments_adapter::list_squad_games(conn, squad_id, limit).await?;
    Ok(rows
        .into_iter()
        .filter_map(|(_, game)| {
            game.map(|g| SquadGame {
                game_id: g.id,
                name: g.name,
                start_date: g.start_date,
                status: g.status,
            })
        })
        .collect())
}
