//! Common test utilities for satd-core
//!
//! This module provides shared git repository fixtures and lineage
//! record assertions for integration tests.

mod fixtures;
mod assertions;

// Re-export all utilities
pub use fixtures::*;
pub use assertions::*;
