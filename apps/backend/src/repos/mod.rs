//! Repository functions for the domain layer.

pub mod enrollments;
pub mod games;
pub mod memberships;
pub mod operators;
pub mod payments;
pub mod rankings;
pub mod squads;
