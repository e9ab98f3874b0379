//! SeaORM -> DomainError translation.
//!
//! Adapters return `sea_orm::DbErr`; repos and services convert through
//! `From<DbErr> for DomainError`, which lands here.

use tracing::{error, warn};

use crate::errors::domain::{ConflictKind, DomainError, InfraErrorKind, NotFoundKind};
use crate::logging::pii::Redacted;
use crate::trace_ctx;

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// The `table.column[, table.column]` list from a SQLite unique violation.
fn sqlite_unique_target(error_msg: &str) -> Option<&str> {
    const MARKER: &str = "UNIQUE constraint failed: ";
    let start = error_msg.find(MARKER)? + MARKER.len();
    let rest = &error_msg[start..];
    let end = rest.find(['\n', '"', ')']).unwrap_or(rest.len());
    Some(rest[..end].trim())
}

fn conflict_for_sqlite_target(target: &str) -> Option<(ConflictKind, &'static str)> {
    let table = target.split('.').next().unwrap_or_default();
    match (table, target) {
        ("game_squads", _) => Some((
            ConflictKind::AlreadyRegistered,
            "Squad already registered for this game",
        )),
        ("game_operators", _) => Some((
            ConflictKind::AlreadyRegistered,
            "Operator already registered for this game",
        )),
        ("squad_members", _) => Some((
            ConflictKind::AlreadyMember,
            "Operator is already a member of this squad",
        )),
        ("join_requests", _) => Some((
            ConflictKind::JoinRequestPending,
            "A join request for this squad already exists",
        )),
        (_, "operators.nickname") => Some((ConflictKind::UniqueNickname, "Nickname already taken")),
        (_, "operators.email") => Some((ConflictKind::UniqueEmail, "Email already registered")),
        (_, "squads.name") => Some((ConflictKind::UniqueSquadName, "Squad name already taken")),
        _ => None,
    }
}

fn conflict_for_postgres_constraint(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    if error_msg.contains("ux_game_squads_game_squad") {
        return Some((
            ConflictKind::AlreadyRegistered,
            "Squad already registered for this game",
        ));
    }
    if error_msg.contains("ux_game_operators_game_operator") {
        return Some((
            ConflictKind::AlreadyRegistered,
            "Operator already registered for this game",
        ));
    }
    if error_msg.contains("ux_squad_members_squad_operator") {
        return Some((
            ConflictKind::AlreadyMember,
            "Operator is already a member of this squad",
        ));
    }
    if error_msg.contains("ux_join_requests_squad_operator") {
        return Some((
            ConflictKind::JoinRequestPending,
            "A join request for this squad already exists",
        ));
    }
    if error_msg.contains("ux_operators_nickname") {
        return Some((ConflictKind::UniqueNickname, "Nickname already taken"));
    }
    if error_msg.contains("ux_operators_email") {
        return Some((ConflictKind::UniqueEmail, "Email already registered"));
    }
    if error_msg.contains("ux_squads_name") {
        return Some((ConflictKind::UniqueSquadName, "Squad name already taken"));
    }
    None
}

/// Translate a `DbErr` into a `DomainError` with sanitized detail.
pub fn map_db_err(e: sea_orm::DbErr) -> DomainError {
    let error_msg = e.to_string();
    let trace_id = trace_ctx::trace_id();

    match &e {
        sea_orm::DbErr::RecordNotFound(msg) => {
            return DomainError::not_found(NotFoundKind::Other("Record".into()), msg.clone());
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database unavailable");
            return DomainError::infra(InfraErrorKind::DbUnavailable, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unique constraint violation");

        if let Some((kind, detail)) =
            sqlite_unique_target(&error_msg).and_then(conflict_for_sqlite_target)
        {
            return DomainError::conflict(kind, detail);
        }
        if let Some((kind, detail)) = conflict_for_postgres_constraint(&error_msg) {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if mentions_sqlstate(&error_msg, "23503") || error_msg.contains("FOREIGN KEY constraint failed")
    {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Foreign key violation");
        return DomainError::not_found(
            NotFoundKind::Other("Reference".into()),
            "Referenced record does not exist",
        );
    }

    if error_msg.contains("timed out") || error_msg.contains("timeout") {
        warn!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, "Database timeout");
    }

    error!(trace_id = %trace_id, raw_error = %Redacted(&error_msg), "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    )
}
