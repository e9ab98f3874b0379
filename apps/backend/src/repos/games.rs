//! Game repository functions for domain layer.

use sea_orm::ConnectionTrait;
use time::OffsetDateTime;

use crate::adapters::games_sea as games_adapter;
use crate::entities::games::{self, GameStatus, GameType};
use crate::errors::domain::DomainError;

/// Game domain model
#[derive(Debug, Clone, PartialEq)]
pub struct Game {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: OffsetDateTime,
    pub end_date: Option<OffsetDateTime>,
    pub game_type: GameType,
    pub status: GameStatus,
    pub max_players: Option<i32>,
    pub current_players: i32,
    pub registration_fee: f64,
    pub is_active: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<games::Model> for Game {
    fn from(model: games::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            location: model.location,
            start_date: model.start_date,
            end_date: model.end_date,
            game_type: model.game_type,
            status: model.status,
            max_players: model.max_players,
            current_players: model.current_players,
            registration_fee: model.registration_fee,
            is_active: model.is_active,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Option<Game>, DomainError> {
    let game = games_adapter::find_by_id(conn, game_id).await?;
    Ok(game.map(Game::from))
}

/// Find game by ID or fail with NotFound(Game).
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Game, DomainError> {
    find_by_id(conn, game_id)
        .await?
        .ok_or_else(|| DomainError::game_not_found(game_id))
}

/// Like `require_game` but inactive games count as missing.
pub async fn require_active_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
) -> Result<Game, DomainError> {
    games_adapter::find_active_by_id(conn, game_id)
        .await?
        .map(Game::from)
        .ok_or_else(|| DomainError::game_not_found(game_id))
}

pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: games_adapter::GameCreate,
) -> Result<Game, DomainError> {
    let game = games_adapter::create_game(conn, dto).await?;
    Ok(Game::from(game))
}

pub async fn update_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    dto: games_adapter::GameUpdate,
) -> Result<Game, DomainError> {
    let game = games_adapter::update_game(conn, game_id, dto).await?;
    Ok(Game::from(game))
}

pub async fn list_active<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    status: Option<GameStatus>,
    offset: u64,
    limit: u64,
) -> Result<(Vec<Game>, u64), DomainError> {
    let (rows, total) = games_adapter::list_active(conn, status, offset, limit).await?;
    Ok((rows.into_iter().map(Game::from).collect(), total))
}

/// Guarded increment of `current_players`; false when capacity would be exceeded.
pub async fn try_increment_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    amount: i32,
) -> Result<bool, DomainError> {
    Ok(games_adapter::try_increment_players(conn, game_id, amount).await?)
}

pub async fn decrement_players<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: i64,
    amount: i32,
) -> Result<(), DomainError> {
    games_adapter::decrement_players(conn, game_id, amount).await?;
    Ok(())
}

pub async fn next_upcoming<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    now: OffsetDateTime,
) -> Result<Option<Game>, DomainError> {
    let game = games_adapter::next_upcoming(conn, now).await?;
    Ok(game.map(Game::from))
}

pub async fn count_all<C: ConnectionTrait + Send + Sync>(conn: &C) -> Result<u64, DomainError> {
    Ok(games_adapter::count_all(conn).await?)
}
