pub mod lineage_tracker;
pub mod pair_resolver;

pub use lineage_tracker::*;
pub use pair_resolver::*;
