/// Lineage Domain Models
pub mod instance;
pub mod similarity;

pub use instance::*;
pub use similarity::*;
