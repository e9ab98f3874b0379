//! Application services. Each takes the connection it should run on, so the
//! same code serves request transactions and direct pool access.

pub mod admin;
pub mod enrollment;
pub mod games;
pub mod operators;
pub mod payments;
pub mod rankings;
pub mod squads;
