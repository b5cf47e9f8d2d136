/// Comment Extraction Infrastructure
pub mod java_source;

pub use java_source::*;
