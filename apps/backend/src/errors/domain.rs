//! Domain-level error type used across services and repos.
//!
//! This error type is HTTP- and DB-agnostic. Handlers return
//! `Result<T, crate::error::AppError>` and convert from `DomainError`
//! through `From<DomainError> for AppError`.

use std::error::Error;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    DbUnavailable,
    Other(String),
}

/// Business-rule and input failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// Game status does not accept registrations
    RegistrationClosed,
    /// Occupancy would go past `max_players`
    CapacityExceeded,
    InvalidField,
    InvalidPagination,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Game,
    Squad,
    Operator,
    /// Enrollment join row
    Registration,
    Ranking,
    /// Squad membership row
    Membership,
    JoinRequest,
    Payment,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    AlreadyRegistered,
    UniqueNickname,
    UniqueEmail,
    UniqueSquadName,
    AlreadyMember,
    /// Operators lead at most one active squad
    AlreadyLeadsSquad,
    JoinRequestPending,
    /// Join request was already accepted or rejected
    JoinRequestProcessed,
    /// The leader cannot be removed from their own squad
    LeaderCannotLeave,
    /// Admins cannot change their own role or active flag
    SelfModification,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ForbiddenKind {
    /// Only the squad's leader may do this
    NotSquadLeader,
    /// Only the resource owner or staff may do this
    NotOwner,
    /// Only the lowest-id active admin may do this
    PrimaryAdminRequired,
    Other(String),
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq)]
pub enum DomainError {
    Validation(ValidationKind, String),
    Conflict(ConflictKind, String),
    NotFound(NotFoundKind, String),
    Forbidden(ForbiddenKind, String),
    Infra(InfraErrorKind, String),
}

impl Display for DomainError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DomainError::Validation(kind, d) => write!(f, "validation {kind:?}: {d}"),
            DomainError::Conflict(kind, d) => write!(f, "conflict {kind:?}: {d}"),
            DomainError::NotFound(kind, d) => write!(f, "not found {kind:?}: {d}"),
            DomainError::Forbidden(kind, d) => write!(f, "forbidden {kind:?}: {d}"),
            DomainError::Infra(kind, d) => write!(f, "infra {kind:?}: {d}"),
        }
    }
}

impl Error for DomainError {}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn forbidden(kind: ForbiddenKind, detail: impl Into<String>) -> Self {
        Self::Forbidden(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, detail: impl Into<String>) -> Self {
        Self::Infra(kind, detail.into())
    }

    pub fn game_not_found(game_id: i64) -> Self {
        Self::not_found(NotFoundKind::Game, format!("Game {game_id} not found"))
    }

    pub fn squad_not_found(squad_id: i64) -> Self {
        Self::not_found(NotFoundKind::Squad, format!("Squad {squad_id} not found"))
    }

    pub fn operator_not_found(operator_id: i64) -> Self {
        Self::not_found(
            NotFoundKind::Operator,
            format!("Operator {operator_id} not found"),
        )
    }

    pub fn payment_not_found(payment_id: i64) -> Self {
        Self::not_found(
            NotFoundKind::Payment,
            format!("Payment {payment_id} not found"),
        )
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        crate::infra::db_errors::map_db_err(e)
    }
}
