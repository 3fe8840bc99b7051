//! Test utilities for use-case and HTTP tests.
//!
//! This module provides:
//! - Test data factories with override closures
//! - An in-memory tenancy store implementing every repository trait
//! - A scripted text generator standing in for the LLM service
//! - `TestAppStateBuilder` for wiring an `AppState` without external services

mod app_state_builder;
mod factories;
mod generator_mocks;
mod rate_limit_mocks;
mod tenancy_mocks;

pub use app_state_builder::*;
pub use factories::*;
pub use generator_mocks::*;
pub use rate_limit_mocks::*;
pub use tenancy_mocks::*;

/// Lowest cost bcrypt accepts; keeps hashing fast in tests.
pub const TEST_BCRYPT_COST: u32 = 4;
