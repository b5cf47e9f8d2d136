//! Usecase layer
//!
//! High-level operations composed from the feature modules, meant to
//! be driven by a CLI or batch runner.

pub mod mining_session;

pub use mining_session::{MiningSession, PairOutcome};
