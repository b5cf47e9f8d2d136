/// Debt Classification Infrastructure
pub mod keyword_predicate;

pub use keyword_predicate::*;
