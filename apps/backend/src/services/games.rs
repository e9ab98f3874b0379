//! Game catalogue: create, list, read and edit games.

use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::info;

use crate::adapters::games_sea::{GameCreate, GameUpdate};
use crate::db::txn::with_nested_txn;
use crate::domain::enrollment::capacity_exceeded;
use crate::domain::pagination::{Page, PageMeta, PageRequest};
use crate::entities::games::GameStatus;
use crate::errors::domain::{DomainError, ValidationKind};
use crate::repos::enrollments::{self, EnrolledOperator, EnrolledSquad};
use crate::repos::games::{self, Game};

pub const MAX_NAME_LEN: usize = 200;

/// A game with the squads enrolled in it.
#[derive(Debug, Clone, PartialEq)]
pub struct GameDetail {
    pub game: Game,
    pub squads: Vec<EnrolledSquad>,
}

fn invalid(detail: impl Into<String>) -> DomainError {
    DomainError::validation(ValidationKind::InvalidField, detail)
}

fn validate_name(name: &str) -> Result<(), DomainError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(invalid("name must not be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(invalid(format!(
            "name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

fn validate_fee(fee: f64) -> Result<(), DomainError> {
    if !fee.is_finite() || fee < 0.0 {
        return Err(invalid("registrationFee must be zero or positive"));
    }
    Ok(())
}

fn validate_max_players(max_players: Option<i32>) -> Result<(), DomainError> {
    match max_players {
        Some(max) if max < 1 => Err(invalid("maxPlayers must be at least 1")),
        _ => Ok(()),
    }
}

fn validate_dates(
    start: time::OffsetDateTime,
    end: Option<time::OffsetDateTime>,
) -> Result<(), DomainError> {
    match end {
        Some(end) if end < start => Err(invalid("endDate must not be before startDate")),
        _ => Ok(()),
    }
}

pub struct GameService;

impl GameService {
    pub fn new() -> Self {
        Self
    }

    pub async fn create_game<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        dto: GameCreate,
    ) -> Result<Game, DomainError> {
        validate_name(&dto.name)?;
        validate_dates(dto.start_date, dto.end_date)?;
        validate_max_players(dto.max_players)?;
        validate_fee(dto.registration_fee)?;

        let dto = GameCreate {
            name: dto.name.trim().to_string(),
            ..dto
        };
        let game = games::create_game(conn, dto).await?;
        info!(game_id = game.id, max_players = ?game.max_players, "Game created");
        Ok(game)
    }

    pub async fn list_games<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        status: Option<GameStatus>,
        request: PageRequest,
    ) -> Result<Page<Game>, DomainError> {
        let (data, total) =
            games::list_active(conn, status, request.offset(), request.limit).await?;
        Ok(Page {
            data,
            meta: PageMeta::new(request, total),
        })
    }

    pub async fn get_game<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        game_id: i64,
    ) -> Result<GameDetail, DomainError> {
        let game = games::require_active_game(conn, game_id).await?;
        let squads = enrollments::list_squads(conn, game_id).await?;
        Ok(GameDetail { game, squads })
    }

    /// Patch organizer-editable fields. The merged result is validated as a
    /// whole; `max_players` may not drop below the current occupancy.
    pub async fn update_game<C: TransactionTrait>(
        &self,
        conn: &C,
        game_id: i64,
        patch: GameUpdate,
    ) -> Result<Game, DomainError> {
        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                let current = games::require_active_game(txn, game_id).await?;

                if let Some(name) = &patch.name {
                    validate_name(name)?;
                }
                let start = patch.start_date.unwrap_or(current.start_date);
                let end = patch.end_date.unwrap_or(current.end_date);
                validate_dates(start, end)?;
                if let Some(fee) = patch.registration_fee {
                    validate_fee(fee)?;
                }
                if let Some(max_players) = patch.max_players {
                    validate_max_players(max_players)?;
                    if let Some(max) = max_players {
                        if max < current.current_players {
                            return Err(capacity_exceeded(game_id));
                        }
                    }
                }

                if patch.is_empty() {
                    return Ok(current);
                }

                let patch = GameUpdate {
                    name: patch.name.map(|n| n.trim().to_string()),
                    ..patch
                };
                let game = games::update_game(txn, game_id, patch).await?;
                info!(game_id, status = ?game.status, "Game updated");
                Ok(game)
            })
        })
        .await
    }

    pub async fn list_game_operators<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        game_id: i64,
    ) -> Result<Vec<EnrolledOperator>, DomainError> {
        games::require_active_game(conn, game_id).await?;
        enrollments::list_operators(conn, game_id).await
    }
}

impl Default for GameService {
    fn default() -> Self {
        Self::new()
    }
}
