/// Diffing Domain Models
pub mod edit;
pub mod file_delta;

pub use edit::*;
pub use file_delta::*;
