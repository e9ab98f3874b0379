//! Enrollment rules shared by squad and operator registration.

use crate::entities::games::GameStatus;
use crate::errors::domain::{DomainError, ValidationKind};

/// Seats taken by an individually registered operator.
pub const OPERATOR_CONTRIBUTION: i32 = 1;

/// Statuses in which new registrations are accepted.
pub fn registration_open(status: GameStatus) -> bool {
    matches!(
        status,
        GameStatus::Scheduled | GameStatus::RegistrationOpen
    )
}

pub fn ensure_registration_open(game_id: i64, status: GameStatus) -> Result<(), DomainError> {
    if registration_open(status) {
        return Ok(());
    }
    Err(DomainError::validation(
        ValidationKind::RegistrationClosed,
        format!("Registration is not open for game {game_id}"),
    ))
}

/// Whether `adding` more players fit. `None` capacity is unbounded.
pub fn fits_capacity(current_players: i32, max_players: Option<i32>, adding: i32) -> bool {
    match max_players {
        None => true,
        Some(max) => i64::from(current_players) + i64::from(adding) <= i64::from(max),
    }
}

pub fn ensure_capacity(
    game_id: i64,
    current_players: i32,
    max_players: Option<i32>,
    adding: i32,
) -> Result<(), DomainError> {
    if fits_capacity(current_players, max_players, adding) {
        return Ok(());
    }
    Err(capacity_exceeded(game_id))
}

pub fn capacity_exceeded(game_id: i64) -> DomainError {
    DomainError::validation(
        ValidationKind::CapacityExceeded,
        format!("Game {game_id} has no room for this registration"),
    )
}
