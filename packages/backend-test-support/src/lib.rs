//! Shared helpers for backend integration tests: logging, problem+json
//! assertions and unique fixture names.

pub mod logging;
pub mod problem_details;
pub mod unique_helpers;
