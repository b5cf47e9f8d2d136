//! Line-edit geometry
//!
//! One `Edit` is a contiguous line-range substitution inside a single
//! file's diff. Coordinates follow the diff library's convention: the
//! begin index is the 0-based first changed line, the end index is
//! exclusive, which equals the 1-based number of the last changed line.
//! Overlap tests compare these directly against 1-based closed comment
//! ranges; an insertion (begin == end) at a range boundary still counts
//! as overlapping. The resolution layer depends on these exact
//! semantics, never on hunk content.

use serde::{Deserialize, Serialize};

/// One contiguous line-range substitution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edit {
    pub old_begin: u32,
    pub old_end: u32,
    pub new_begin: u32,
    pub new_end: u32,
}

impl Edit {
    pub fn new(old_begin: u32, old_end: u32, new_begin: u32, new_end: u32) -> Self {
        Self {
            old_begin,
            old_end,
            new_begin,
            new_end,
        }
    }

    /// Overlap with a closed line interval `[lo, hi]` on the old side
    pub fn occurs_in_old(&self, lo: u32, hi: u32) -> bool {
        occurs_between(self.old_begin, self.old_end, lo, hi)
    }

    /// Overlap with a closed line interval `[lo, hi]` on the new side
    pub fn occurs_in_new(&self, lo: u32, hi: u32) -> bool {
        occurs_between(self.new_begin, self.new_end, lo, hi)
    }

    /// New-side overlap with the end bound widened by `slack` lines,
    /// used when a candidate comment shrank relative to its ancestor
    pub fn occurs_in_new_with_slack(&self, lo: u32, hi: u32, slack: u32) -> bool {
        occurs_between(self.new_begin, self.new_end + slack, lo, hi)
    }

    /// Number of old-side lines this edit replaces
    pub fn old_len(&self) -> u32 {
        self.old_end.saturating_sub(self.old_begin)
    }

    /// Number of new-side lines this edit produces
    pub fn new_len(&self) -> u32 {
        self.new_end.saturating_sub(self.new_begin)
    }

    /// True when the edit produces more lines than it replaces
    pub fn grows(&self) -> bool {
        self.new_len() > self.old_len()
    }
}

/// Closed-interval overlap: `max(begin, lo) <= min(end, hi)`
fn occurs_between(begin: u32, end: u32, lo: u32, hi: u32) -> bool {
    begin.max(lo) <= end.min(hi)
}
