/// Comment Domain Models
pub mod grouped_comment;
pub mod grouping;

pub use grouped_comment::*;
pub use grouping::*;
