pub mod bisection;
pub mod classification;
pub mod comments;
pub mod diffing;
pub mod lineage;
