/// Comment Extraction & Grouping Feature
///
/// Turns raw source comments into the grouped logical units the
/// resolver tracks, with enclosing class/method resolved by line
/// containment.
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::*;
pub use infrastructure::*;
pub use ports::*;
