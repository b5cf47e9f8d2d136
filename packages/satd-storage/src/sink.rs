//! Result sink port
//!
//! Boundary between the resolver and persistence. A sink accepts
//! finished batches only; it never sees records mid-construction, so a
//! failed batch cannot corrupt previously written pairs.

use satd_core::{LocatedResolution, PairOutcome};

use crate::error::Result;

/// Persistence boundary for finished lineage batches
pub trait ResolutionSink {
    /// Persist one commit-pair batch with its commit metadata
    fn write_pair(&mut self, outcome: &PairOutcome) -> Result<()>;

    /// Persist range-mode records, each carrying its own resolving
    /// commit
    fn write_located(&mut self, batch: &[LocatedResolution]) -> Result<()>;

    /// Force buffered output down to the underlying medium
    fn flush(&mut self) -> Result<()>;
}
