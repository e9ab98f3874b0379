//! SeaORM adapters. Every function is generic over `ConnectionTrait` and
//! returns `DbErr`; the repos layer maps to `DomainError`.

pub mod enrollments_sea;
pub mod games_sea;
pub mod join_requests_sea;
pub mod operators_sea;
pub mod payments_sea;
pub mod rankings_sea;
pub mod search;
pub mod squad_members_sea;
pub mod squads_sea;
