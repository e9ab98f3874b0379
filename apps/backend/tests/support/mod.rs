#![allow(dead_code, unused_imports, unused_macros)]

pub mod factory;
pub mod test_state;

pub use test_state::build_test_state;
