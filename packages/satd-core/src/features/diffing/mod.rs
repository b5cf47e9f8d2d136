/// Diffing Feature
///
/// Classifies file-level changes between two commits and exposes the
/// line-edit geometry the resolution policies work on.
pub mod domain;
pub mod infrastructure;

pub use domain::*;
pub use infrastructure::*;
