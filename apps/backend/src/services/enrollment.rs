//! Capacity-checked enrollment of squads and operators into games.
//!
//! Every operation runs as one nested transaction: the join-row write and
//! the `current_players` update land together or not at all. Registration
//! additionally goes through a guarded single-statement increment, so two
//! concurrent registrations cannot both pass a stale capacity check.
//!
//! `total_members` is read once per registration; a membership edit landing
//! between that read and the write is not detected.

use sea_orm::TransactionTrait;
use tracing::{debug, info};

use crate::db::txn::with_nested_txn;
use crate::domain::enrollment::{
    capacity_exceeded, ensure_capacity, ensure_registration_open, OPERATOR_CONTRIBUTION,
};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::repos::{enrollments, games, operators, squads};

/// Enrollment domain service.
pub struct EnrollmentService;

impl EnrollmentService {
    pub fn new() -> Self {
        Self
    }

    pub async fn register_squad<C: TransactionTrait>(
        &self,
        conn: &C,
        game_id: i64,
        squad_id: i64,
    ) -> Result<(), DomainError> {
        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                let game = games::require_game(txn, game_id).await?;
                ensure_registration_open(game_id, game.status)?;

                if enrollments::squad_registered(txn, game_id, squad_id).await? {
                    return Err(DomainError::conflict(
                        ConflictKind::AlreadyRegistered,
                        format!("Squad {squad_id} is already registered for game {game_id}"),
                    ));
                }

                let squad = squads::require_squad(txn, squad_id).await?;
                ensure_capacity(
                    game_id,
                    game.current_players,
                    game.max_players,
                    squad.total_members,
                )?;

                if !games::try_increment_players(txn, game_id, squad.total_members).await? {
                    debug!(game_id, squad_id, "Capacity guard rejected increment");
                    return Err(capacity_exceeded(game_id));
                }
                enrollments::insert_squad(txn, game_id, squad_id).await?;

                info!(
                    game_id,
                    squad_id,
                    added_players = squad.total_members,
                    "Squad registered"
                );
                Ok(())
            })
        })
        .await
    }

    pub async fn unregister_squad<C: TransactionTrait>(
        &self,
        conn: &C,
        game_id: i64,
        squad_id: i64,
    ) -> Result<(), DomainError> {
        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                games::require_game(txn, game_id).await?;
                let squad = squads::require_squad(txn, squad_id).await?;

                if !enrollments::delete_squad(txn, game_id, squad_id).await? {
                    return Err(DomainError::not_found(
                        NotFoundKind::Registration,
                        format!("Squad {squad_id} is not registered for game {game_id}"),
                    ));
                }
                games::decrement_players(txn, game_id, squad.total_members).await?;

                info!(
                    game_id,
                    squad_id,
                    removed_players = squad.total_members,
                    "Squad unregistered"
                );
                Ok(())
            })
        })
        .await
    }

    pub async fn register_operator<C: TransactionTrait>(
        &self,
        conn: &C,
        game_id: i64,
        operator_id: i64,
    ) -> Result<(), DomainError> {
        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                let game = games::require_game(txn, game_id).await?;
                ensure_registration_open(game_id, game.status)?;

                if enrollments::operator_registered(txn, game_id, operator_id).await? {
                    return Err(DomainError::conflict(
                        ConflictKind::AlreadyRegistered,
                        format!("Operator {operator_id} is already registered for game {game_id}"),
                    ));
                }

                operators::require_operator(txn, operator_id).await?;
                ensure_capacity(
                    game_id,
                    game.current_players,
                    game.max_players,
                    OPERATOR_CONTRIBUTION,
                )?;

                if !games::try_increment_players(txn, game_id, OPERATOR_CONTRIBUTION).await? {
                    debug!(game_id, operator_id, "Capacity guard rejected increment");
                    return Err(capacity_exceeded(game_id));
                }
                enrollments::insert_operator(txn, game_id, operator_id).await?;

                info!(game_id, operator_id, "Operator registered");
                Ok(())
            })
        })
        .await
    }

    pub async fn unregister_operator<C: TransactionTrait>(
        &self,
        conn: &C,
        game_id: i64,
        operator_id: i64,
    ) -> Result<(), DomainError> {
        with_nested_txn(conn, |txn| {
            Box::pin(async move {
                games::require_game(txn, game_id).await?;
                operators::require_operator(txn, operator_id).await?;

                if !enrollments::delete_operator(txn, game_id, operator_id).await? {
                    return Err(DomainError::not_found(
                        NotFoundKind::Registration,
                        format!("Operator {operator_id} is not registered for game {game_id}"),
                    ));
                }
                games::decrement_players(txn, game_id, OPERATOR_CONTRIBUTION).await?;

                info!(game_id, operator_id, "Operator unregistered");
                Ok(())
            })
        })
        .await
    }
}

impl Default for EnrollmentService {
    fn default() -> Self {
        Self::new()
    }
}
