//! DTOs for games_sea adapter.

use time::OffsetDateTime;

use crate::entities::games::{GameStatus, GameType};

/// DTO for creating a new game.
#[derive(Debug, Clone)]
pub struct GameCreate {
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub start_date: OffsetDateTime,
    pub end_date: Option<OffsetDateTime>,
    pub game_type: GameType,
    pub max_players: Option<i32>,
    pub registration_fee: f64,
}

impl GameCreate {
    pub fn new(name: impl Into<String>, start_date: OffsetDateTime) -> Self {
        Self {
            name: name.into(),
            description: None,
            location: None,
            start_date,
            end_date: None,
            game_type: GameType::Milsim,
            max_players: None,
            registration_fee: 0.0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_end_date(mut self, end_date: OffsetDateTime) -> Self {
        self.end_date = Some(end_date);
        self
    }

    pub fn with_game_type(mut self, game_type: GameType) -> Self {
        self.game_type = game_type;
        self
    }

    pub fn with_max_players(mut self, max_players: i32) -> Self {
        self.max_players = Some(max_players);
        self
    }

    pub fn with_registration_fee(mut self, fee: f64) -> Self {
        self.registration_fee = fee;
        self
    }
}

/// Partial update of the organizer-editable fields.
///
/// Nullable columns use three states: None = no change, Some(None) = clear,
/// Some(Some(v)) = set. `current_players` is never touched here.
#[derive(Debug, Clone, Default)]
pub struct GameUpdate {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub location: Option<Option<String>>,
    pub start_date: Option<OffsetDateTime>,
    pub end_date: Option<Option<OffsetDateTime>>,
    pub game_type: Option<GameType>,
    pub status: Option<GameStatus>,
    pub max_players: Option<Option<i32>>,
    pub registration_fee: Option<f64>,
}

impl GameUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_status(mut self, status: GameStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_max_players(mut self, max_players: Option<i32>) -> Self {
        self.max_players = Some(max_players);
        self
    }

    pub fn with_registration_fee(mut self, fee: f64) -> Self {
        self.registration_fee = Some(fee);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.location.is_none()
            && self.start_date.is_none()
            && self.end_date.is_none()
            && self.game_type.is_none()
            && self.status.is_none()
            && self.max_players.is_none()
            && self.registration_fee.is_none()
    }
}
