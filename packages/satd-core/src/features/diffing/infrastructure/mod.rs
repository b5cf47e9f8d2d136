/// Diffing Infrastructure
pub mod commit_differ;

pub use commit_differ::*;
