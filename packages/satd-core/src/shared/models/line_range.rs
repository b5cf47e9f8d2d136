//! Source line range types
//!
//! Comment positions and declaration extents are tracked as 1-based,
//! inclusive line ranges; columns never participate in resolution.

use serde::{Deserialize, Serialize};

/// Inclusive 1-based line range in a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    pub start_line: u32,
    pub end_line: u32,
}

impl LineRange {
    /// Sentinel for "no enclosing declaration" / "no comment"
    pub const NONE: LineRange = LineRange {
        start_line: 0,
        end_line: 0,
    };

    pub fn new(start_line: u32, end_line: u32) -> Self {
        Self {
            start_line,
            end_line,
        }
    }

    /// True for the sentinel range
    pub fn is_none(&self) -> bool {
        self.start_line == 0 && self.end_line == 0
    }

    pub fn contains_line(&self, line: u32) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    pub fn contains(&self, other: &LineRange) -> bool {
        self.start_line <= other.start_line && other.end_line <= self.end_line
    }

    /// Closed-interval overlap with another range
    pub fn intersects(&self, other: &LineRange) -> bool {
        self.start_line.max(other.start_line) <= self.end_line.min(other.end_line)
    }

    pub fn line_count(&self) -> u32 {
        if self.is_none() || self.end_line < self.start_line {
            0
        } else {
            self.end_line - self.start_line + 1
        }
    }
}

impl Default for LineRange {
    fn default() -> Self {
        Self::NONE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_line() {
        let range = LineRange::new(10, 20);
        assert!(range.contains_line(10));
        assert!(range.contains_line(15));
        assert!(range.contains_line(20));
        assert!(!range.contains_line(9));
        assert!(!range.contains_line(21));
    }

    #[test]
    fn test_contains_range() {
        let outer = LineRange::new(5, 30);
        assert!(outer.contains(&LineRange::new(5, 30)));
        assert!(outer.contains(&LineRange::new(10, 20)));
        assert!(!outer.contains(&LineRange::new(4, 20)));
        assert!(!outer.contains(&LineRange::new(10, 31)));
    }

    #[test]
    fn test_intersects() {
        let range = LineRange::new(10, 20);
        assert!(range.intersects(&LineRange::new(20, 25)));
        assert!(range.intersects(&LineRange::new(1, 10)));
        assert!(range.intersects(&LineRange::new(12, 12)));
        assert!(!range.intersects(&LineRange::new(21, 25)));
        assert!(!range.intersects(&LineRange::new(1, 9)));
    }

    #[test]
    fn test_line_count() {
        assert_eq!(LineRange::new(10, 20).line_count(), 11);
        assert_eq!(LineRange::new(7, 7).line_count(), 1);
        assert_eq!(LineRange::NONE.line_count(), 0);
    }

    #[test]
    fn test_none_sentinel() {
        assert!(LineRange::NONE.is_none());
        assert!(!LineRange::new(1, 1).is_none());
        assert_eq!(LineRange::default(), LineRange::NONE);
    }
}
