//! Lineage record assertions
//!
//! Domain-specific assertions over resolved record batches, with
//! failure messages listing what the batch actually held.

use satd_core::{Resolution, SatdInstance};

/// Assert the batch holds exactly one record with the expected
/// resolution, and return it
pub fn assert_single_record(records: &[SatdInstance], expected: Resolution) -> &SatdInstance {
    assert_eq!(
        records.len(),
        1,
        "Expected exactly one record, got {}: {:?}",
        records.len(),
        resolutions_of(records)
    );
    assert_eq!(
        records[0].resolution,
        expected,
        "Expected {expected}, batch: {:?}",
        resolutions_of(records)
    );
    &records[0]
}

/// Assert at least one record carries the resolution and return the
/// first one
pub fn find_record(records: &[SatdInstance], wanted: Resolution) -> &SatdInstance {
    records
        .iter()
        .find(|r| r.resolution == wanted)
        .unwrap_or_else(|| panic!("No {wanted} record, batch: {:?}", resolutions_of(records)))
}

/// Assert how many records carry one resolution
pub fn assert_resolution_count(records: &[SatdInstance], wanted: Resolution, expected: usize) {
    let actual = records.iter().filter(|r| r.resolution == wanted).count();
    assert_eq!(
        actual, expected,
        "Expected {expected} {wanted} record(s), batch: {:?}",
        resolutions_of(records)
    );
}

/// Resolution names of a batch, for failure messages
pub fn resolutions_of(records: &[SatdInstance]) -> Vec<&'static str> {
    records.iter().map(|r| r.resolution.as_str()).collect()
}
