// Domain-to-HTTP error mapping, no database or server involved.
use crate::error::AppError;
use crate::errors::domain::{
    ConflictKind, DomainError, ForbiddenKind, InfraErrorKind, NotFoundKind, ValidationKind,
};
use crate::errors::ErrorCode;

fn app(de: DomainError) -> AppError {
    de.into()
}

#[test]
fn enrollment_rule_failures_are_bad_requests() {
    let closed = app(DomainError::validation(
        ValidationKind::RegistrationClosed,
        "Registration is not open",
    ));
    assert_eq!(closed.code(), ErrorCode::RegistrationClosed);
    assert_eq!(closed.status().as_u16(), 400);

    let full = app(DomainError::validation(
        ValidationKind::CapacityExceeded,
        "Game is full",
    ));
    assert_eq!(full.code().as_str(), "CAPACITY_EXCEEDED");
    assert_eq!(full.status().as_u16(), 400);
    assert_eq!(full.detail(), "Game is full");
}

#[test]
fn field_and_paging_validation() {
    let field = app(DomainError::validation(ValidationKind::InvalidField, "name"));
    assert_eq!(field.code(), ErrorCode::ValidationError);

    let other = app(DomainError::validation(
        ValidationKind::Other("whatever".into()),
        "x",
    ));
    assert_eq!(other.code(), ErrorCode::ValidationError);
    assert_eq!(other.status().as_u16(), 400);

    let paging = app(DomainError::validation(
        ValidationKind::InvalidPagination,
        "limit must be between 1 and 100",
    ));
    assert_eq!(paging.code().as_str(), "INVALID_PAGINATION");
}

#[test]
fn conflicts_keep_their_kind() {
    let cases = [
        (ConflictKind::AlreadyRegistered, "ALREADY_REGISTERED"),
        (ConflictKind::UniqueNickname, "NICKNAME_TAKEN"),
        (ConflictKind::UniqueEmail, "EMAIL_TAKEN"),
        (ConflictKind::UniqueSquadName, "SQUAD_NAME_TAKEN"),
        (ConflictKind::AlreadyMember, "ALREADY_MEMBER"),
        (ConflictKind::AlreadyLeadsSquad, "ALREADY_LEADS_SQUAD"),
        (ConflictKind::JoinRequestPending, "JOIN_REQUEST_PENDING"),
        (ConflictKind::JoinRequestProcessed, "JOIN_REQUEST_PROCESSED"),
        (ConflictKind::LeaderCannotLeave, "LEADER_CANNOT_LEAVE"),
        (ConflictKind::SelfModification, "SELF_MODIFICATION"),
        (ConflictKind::Other("Unique".into()), "CONFLICT"),
    ];
    for (kind, code) in cases {
        let err = app(DomainError::conflict(kind, "dup"));
        assert_eq!(err.code().as_str(), code);
        assert_eq!(err.status().as_u16(), 409);
    }
}

#[test]
fn not_found_kinds_name_the_resource() {
    assert_eq!(
        app(DomainError::game_not_found(3)).code(),
        ErrorCode::GameNotFound
    );
    assert_eq!(
        app(DomainError::squad_not_found(3)).code(),
        ErrorCode::SquadNotFound
    );
    assert_eq!(
        app(DomainError::operator_not_found(3)).code(),
        ErrorCode::OperatorNotFound
    );

    let reg = app(DomainError::not_found(NotFoundKind::Registration, "none"));
    assert_eq!(reg.code().as_str(), "REGISTRATION_NOT_FOUND");
    let ranking = app(DomainError::not_found(NotFoundKind::Ranking, "none"));
    assert_eq!(ranking.code().as_str(), "RANKING_NOT_FOUND");
    let membership = app(DomainError::not_found(NotFoundKind::Membership, "none"));
    assert_eq!(membership.code().as_str(), "MEMBERSHIP_NOT_FOUND");
    let request = app(DomainError::not_found(NotFoundKind::JoinRequest, "none"));
    assert_eq!(request.code().as_str(), "JOIN_REQUEST_NOT_FOUND");
    assert_eq!(
        app(DomainError::payment_not_found(3)).code(),
        ErrorCode::PaymentNotFound
    );
    let generic = app(DomainError::not_found(NotFoundKind::Other("Record".into()), "gone"));
    assert_eq!(generic.code(), ErrorCode::NotFound);
    assert_eq!(generic.status().as_u16(), 404);
}

#[test]
fn forbidden_kinds_are_403() {
    let cases = [
        (ForbiddenKind::NotSquadLeader, "NOT_SQUAD_LEADER"),
        (ForbiddenKind::PrimaryAdminRequired, "PRIMARY_ADMIN_REQUIRED"),
        (ForbiddenKind::NotOwner, "FORBIDDEN"),
        (ForbiddenKind::Other("x".into()), "FORBIDDEN"),
    ];
    for (kind, code) in cases {
        let err = app(DomainError::forbidden(kind, "no"));
        assert_eq!(err.code().as_str(), code);
        assert_eq!(err.status().as_u16(), 403);
        assert_eq!(err.detail(), "no");
    }
}

#[test]
fn infra_failures() {
    let timeout = app(DomainError::infra(InfraErrorKind::Timeout, "slow"));
    assert_eq!(timeout.code().as_str(), "DB_TIMEOUT");
    assert_eq!(timeout.status().as_u16(), 504);
    assert!(matches!(timeout, AppError::Timeout { .. }));

    let down = app(DomainError::infra(InfraErrorKind::DbUnavailable, "down"));
    assert_eq!(down.code(), ErrorCode::DbUnavailable);
    assert_eq!(down.status().as_u16(), 503);

    let other = app(DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        "Database operation failed",
    ));
    assert_eq!(other.code(), ErrorCode::DbError);
    assert_eq!(other.status().as_u16(), 500);
}
