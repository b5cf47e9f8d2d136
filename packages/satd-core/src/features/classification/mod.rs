/// Debt Classification Feature
///
/// The pluggable SATD predicate and its default keyword matcher.
pub mod infrastructure;
pub mod ports;

pub use infrastructure::*;
pub use ports::*;
