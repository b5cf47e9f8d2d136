//! Changed-file model

use serde::{Deserialize, Serialize};

/// Kind of change a path underwent between two commits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeKind {
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
}

/// One changed path between two commit trees
///
/// Both paths are always populated: an added file carries its new path
/// on both sides, a deleted file its old path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileDelta {
    pub old_path: String,
    pub new_path: String,
    pub kind: ChangeKind,
}

impl FileDelta {
    pub fn new(old_path: impl Into<String>, new_path: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            old_path: old_path.into(),
            new_path: new_path.into(),
            kind,
        }
    }

    /// True for RENAME and COPY entries
    pub fn is_rename_like(&self) -> bool {
        matches!(self.kind, ChangeKind::Renamed | ChangeKind::Copied)
    }

    /// True when the old side of this delta still exists in the old tree
    pub fn has_old_side(&self) -> bool {
        self.kind != ChangeKind::Added
    }

    /// True when the new side of this delta exists in the new tree
    pub fn has_new_side(&self) -> bool {
        self.kind != ChangeKind::Deleted
    }
}
