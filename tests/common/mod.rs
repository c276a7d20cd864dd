//! Shared test infrastructure: in-memory application setup, request
//! helpers and data factories.

pub mod factories;

pub use factories::*;
pub use test_app::*;
