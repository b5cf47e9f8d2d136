/// Shared model types
pub mod commit_meta;
pub mod line_range;

pub use commit_meta::*;
pub use line_range::*;
