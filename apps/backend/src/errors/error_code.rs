//! Error codes for the API.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! Every code is SCREAMING_SNAKE_CASE and maps 1:1 to the string that
//! appears in the `code` field of problem details responses.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// Authentication required
    Unauthorized,
    /// Authorization header present but not `Bearer <token>`
    UnauthorizedMissingBearer,
    /// Token failed verification
    UnauthorizedInvalidJwt,
    /// Token expired
    UnauthorizedExpiredJwt,
    /// Access denied
    Forbidden,
    /// Token subject does not resolve to an active operator
    ForbiddenUserNotFound,
    /// Operator role is not allowed to perform the operation
    InsufficientRole,
    /// Squad action reserved for the squad's leader
    NotSquadLeader,
    /// Admin action reserved for the primary (lowest-id active) admin
    PrimaryAdminRequired,

    // Request Validation
    /// Path identifier is not a positive integer
    InvalidId,
    /// page/limit out of range
    InvalidPagination,
    /// Field-level validation failure
    ValidationError,
    /// Malformed request
    BadRequest,
    /// Game status does not accept registrations
    RegistrationClosed,
    /// Registration would exceed the game's capacity
    CapacityExceeded,

    // Resource Not Found
    GameNotFound,
    SquadNotFound,
    OperatorNotFound,
    /// The squad/operator being unregistered is not enrolled
    RegistrationNotFound,
    RankingNotFound,
    /// Operator is not a member of the squad
    MembershipNotFound,
    JoinRequestNotFound,
    PaymentNotFound,
    NotFound,

    // Conflicts
    /// Squad or operator already enrolled in the game
    AlreadyRegistered,
    NicknameTaken,
    EmailTaken,
    SquadNameTaken,
    AlreadyMember,
    AlreadyLeadsSquad,
    JoinRequestPending,
    JoinRequestProcessed,
    LeaderCannotLeave,
    /// Admin targeted their own account
    SelfModification,
    Conflict,

    // Infrastructure
    DbError,
    DbUnavailable,
    DbTimeout,
    Internal,
    ConfigError,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::UnauthorizedMissingBearer => "UNAUTHORIZED_MISSING_BEARER",
            Self::UnauthorizedInvalidJwt => "UNAUTHORIZED_INVALID_JWT",
            Self::UnauthorizedExpiredJwt => "UNAUTHORIZED_EXPIRED_JWT",
            Self::Forbidden => "FORBIDDEN",
            Self::ForbiddenUserNotFound => "FORBIDDEN_USER_NOT_FOUND",
            Self::InsufficientRole => "INSUFFICIENT_ROLE",
            Self::NotSquadLeader => "NOT_SQUAD_LEADER",
            Self::PrimaryAdminRequired => "PRIMARY_ADMIN_REQUIRED",

            Self::InvalidId => "INVALID_ID",
            Self::InvalidPagination => "INVALID_PAGINATION",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::RegistrationClosed => "REGISTRATION_CLOSED",
            Self::CapacityExceeded => "CAPACITY_EXCEEDED",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::SquadNotFound => "SQUAD_NOT_FOUND",
            Self::OperatorNotFound => "OPERATOR_NOT_FOUND",
            Self::RegistrationNotFound => "REGISTRATION_NOT_FOUND",
            Self::RankingNotFound => "RANKING_NOT_FOUND",
            Self::MembershipNotFound => "MEMBERSHIP_NOT_FOUND",
            Self::JoinRequestNotFound => "JOIN_REQUEST_NOT_FOUND",
            Self::PaymentNotFound => "PAYMENT_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::AlreadyRegistered => "ALREADY_REGISTERED",
            Self::NicknameTaken => "NICKNAME_TAKEN",
            Self::EmailTaken => "EMAIL_TAKEN",
            Self::SquadNameTaken => "SQUAD_NAME_TAKEN",
            Self::AlreadyMember => "ALREADY_MEMBER",
            Self::AlreadyLeadsSquad => "ALREADY_LEADS_SQUAD",
            Self::JoinRequestPending => "JOIN_REQUEST_PENDING",
            Self::JoinRequestProcessed => "JOIN_REQUEST_PROCESSED",
            Self::LeaderCannotLeave => "LEADER_CANNOT_LEAVE",
            Self::SelfModification => "SELF_MODIFICATION",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::Internal => "INTERNAL",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
