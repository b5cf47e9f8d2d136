//! SATD lineage records
//!
//! A `SatdInstance` captures one resolved fate of one tracked comment
//! across a commit pair or commit range. Records are constructed
//! complete at the return point of each resolution branch and never
//! mutated afterwards; lineage bookkeeping produces adjusted copies.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::features::comments::domain::{CommentKind, GroupedComment, NO_CONTAINER};
use crate::shared::models::LineRange;

/// What happened to one SATD comment across a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Resolution {
    FileRemoved,
    FilePathChanged,
    SatdRemoved,
    SatdChanged,
    SatdAdded,
    ClassOrMethodChanged,
    SatdMovedFile,
    /// Range mode: the comment's lines shrank at the flip commit but
    /// the edit also introduced text, so removal is not certain
    SatdPossiblyRemoved,
    /// Range mode: the comment is still present at the newest endpoint
    SatdUnaddressed,
    /// Range mode: probing failed for this comment only
    ErrorUnknown,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::FileRemoved => "FILE_REMOVED",
            Resolution::FilePathChanged => "FILE_PATH_CHANGED",
            Resolution::SatdRemoved => "SATD_REMOVED",
            Resolution::SatdChanged => "SATD_CHANGED",
            Resolution::SatdAdded => "SATD_ADDED",
            Resolution::ClassOrMethodChanged => "CLASS_OR_METHOD_CHANGED",
            Resolution::SatdMovedFile => "SATD_MOVED_FILE",
            Resolution::SatdPossiblyRemoved => "SATD_POSSIBLY_REMOVED",
            Resolution::SatdUnaddressed => "SATD_UNADDRESSED",
            Resolution::ErrorUnknown => "ERROR_UNKNOWN",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comment state captured in a lineage record
///
/// Absence (file deleted, comment removed, not-yet-added) is an
/// explicit marker value, never a subtype: the sentinel carries the
/// empty range and placeholder text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentSnapshot {
    pub range: LineRange,
    pub text: String,
    pub kind: CommentKind,
    pub containing_class: String,
    pub containing_method: String,
}

impl CommentSnapshot {
    /// Snapshot a live comment
    pub fn of(comment: &GroupedComment) -> Self {
        Self {
            range: comment.range,
            text: comment.text.clone(),
            kind: comment.kind,
            containing_class: comment.containing_class.clone(),
            containing_method: comment.containing_method.clone(),
        }
    }

    /// The "no comment" marker
    pub fn absent() -> Self {
        Self {
            range: LineRange::NONE,
            text: NO_CONTAINER.to_string(),
            kind: CommentKind::Unknown,
            containing_class: NO_CONTAINER.to_string(),
            containing_method: NO_CONTAINER.to_string(),
        }
    }

    pub fn is_absent(&self) -> bool {
        self.range.is_none()
    }
}

/// One lineage record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SatdInstance {
    /// Lineage id, shared by records of the same logical comment
    /// across a chain of commits
    pub id: u64,
    /// Ancestor lineage id for records split off one comment
    pub parent_id: Option<u64>,
    /// Disambiguates otherwise-identical co-existing records
    pub duplication_id: u32,
    pub old_file: String,
    pub old_comment: CommentSnapshot,
    pub new_file: String,
    pub new_comment: CommentSnapshot,
    pub resolution: Resolution,
}

impl SatdInstance {
    /// Build a record; at most one side may be absent
    pub fn new(
        old_file: impl Into<String>,
        old_comment: CommentSnapshot,
        new_file: impl Into<String>,
        new_comment: CommentSnapshot,
        resolution: Resolution,
    ) -> Self {
        assert!(
            !(old_comment.is_absent() && new_comment.is_absent()),
            "a lineage record must keep at least one comment side"
        );
        Self {
            id: 0,
            parent_id: None,
            duplication_id: 0,
            old_file: old_file.into(),
            old_comment,
            new_file: new_file.into(),
            new_comment,
            resolution,
        }
    }

    /// Attach lineage bookkeeping, consuming the record
    pub fn with_lineage(mut self, id: u64, parent_id: Option<u64>, duplication_id: u32) -> Self {
        self.id = id;
        self.parent_id = parent_id;
        self.duplication_id = duplication_id;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(text: &str) -> GroupedComment {
        GroupedComment::new(
            LineRange::new(10, 10),
            text,
            CommentKind::Line,
            "Foo",
            LineRange::new(1, 1),
            "bar()",
            LineRange::new(5, 5),
        )
    }

    #[test]
    fn test_resolution_wire_names() {
        assert_eq!(Resolution::SatdRemoved.as_str(), "SATD_REMOVED");
        assert_eq!(
            Resolution::ClassOrMethodChanged.to_string(),
            "CLASS_OR_METHOD_CHANGED"
        );

        let json = serde_json::to_string(&Resolution::FilePathChanged).unwrap();
        assert_eq!(json, "\"FILE_PATH_CHANGED\"");
    }

    #[test]
    fn test_snapshot_of_comment() {
        let snap = CommentSnapshot::of(&comment("TODO fix"));
        assert!(!snap.is_absent());
        assert_eq!(snap.text, "TODO fix");
        assert_eq!(snap.containing_method, "bar()");
    }

    #[test]
    fn test_absent_snapshot() {
        let snap = CommentSnapshot::absent();
        assert!(snap.is_absent());
        assert_eq!(snap.text, NO_CONTAINER);
    }

    #[test]
    fn test_instance_construction() {
        let record = SatdInstance::new(
            "Foo.java",
            CommentSnapshot::of(&comment("TODO fix")),
            "Foo.java",
            CommentSnapshot::absent(),
            Resolution::SatdRemoved,
        )
        .with_lineage(7, Some(3), 1);

        assert_eq!(record.id, 7);
        assert_eq!(record.parent_id, Some(3));
        assert_eq!(record.duplication_id, 1);
        assert!(record.new_comment.is_absent());
    }

    #[test]
    #[should_panic(expected = "at least one comment side")]
    fn test_both_sides_absent_is_rejected() {
        let _ = SatdInstance::new(
            "Foo.java",
            CommentSnapshot::absent(),
            "Foo.java",
            CommentSnapshot::absent(),
            Resolution::SatdRemoved,
        );
    }
}
