//! Shared test utilities for registre integration tests.
//!
//! This module provides:
//! - `TestHarness` for isolated tests backed by a temporary database
//! - Builders for request bodies and forms

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::TestHarness;
