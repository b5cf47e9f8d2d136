//! Grouped comment model
//!
//! A `GroupedComment` is the logical comment unit the resolver works
//! on: one or more contiguous raw comments merged together, with the
//! enclosing class/method resolved by line containment.

use serde::{Deserialize, Serialize};

use crate::shared::models::LineRange;

/// Placeholder container name when no class/method encloses a comment
pub const NO_CONTAINER: &str = "None";

/// Syntactic kind of a comment unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommentKind {
    /// `// ...`
    Line,
    /// `/* ... */`
    Block,
    /// Comment outside any type declaration (file headers, stray text)
    Orphan,
    /// `/** ... */` documentation, excluded from mining
    JavaDoc,
    /// Disabled code masquerading as a comment, excluded from mining
    CommentedOutSource,
    Unknown,
}

/// One logical comment unit in one file version
///
/// Constructed once per parse and never mutated. The kind recorded here
/// is the effective kind: any unit whose normalized text contains
/// code-like tokens (`{` or `;`) is classified CommentedOutSource no
/// matter what its syntax was.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GroupedComment {
    /// Unit extent, 1-based inclusive
    pub range: LineRange,
    /// Normalized text: delimiters dropped, leading `*`/whitespace
    /// stripped per line, lines joined with '\n'
    pub text: String,
    pub kind: CommentKind,
    /// Innermost enclosing class name, or [`NO_CONTAINER`]
    pub containing_class: String,
    /// Enclosing class declaration header lines
    pub class_declaration: LineRange,
    /// Innermost enclosing method signature, or [`NO_CONTAINER`]
    pub containing_method: String,
    /// Enclosing method declaration header lines
    pub method_declaration: LineRange,
}

impl GroupedComment {
    /// Build a unit, applying the commented-out-source override
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        range: LineRange,
        text: impl Into<String>,
        kind: CommentKind,
        containing_class: impl Into<String>,
        class_declaration: LineRange,
        containing_method: impl Into<String>,
        method_declaration: LineRange,
    ) -> Self {
        let text = text.into();
        let kind = if looks_like_source(&text) {
            CommentKind::CommentedOutSource
        } else {
            kind
        };
        Self {
            range,
            text,
            kind,
            containing_class: containing_class.into(),
            class_declaration,
            containing_method: containing_method.into(),
            method_declaration,
        }
    }

    /// Build a unit with no resolvable container
    pub fn orphan(range: LineRange, text: impl Into<String>, kind: CommentKind) -> Self {
        Self::new(
            range,
            text,
            kind,
            NO_CONTAINER,
            LineRange::NONE,
            NO_CONTAINER,
            LineRange::NONE,
        )
    }

    pub fn start_line(&self) -> u32 {
        self.range.start_line
    }

    pub fn end_line(&self) -> u32 {
        self.range.end_line
    }

    /// True when an enclosing class was resolved
    pub fn has_class(&self) -> bool {
        self.containing_class != NO_CONTAINER
    }

    /// True when an enclosing method was resolved
    pub fn has_method(&self) -> bool {
        self.containing_method != NO_CONTAINER
    }

    /// Text with newlines collapsed to spaces and trimmed, the form
    /// compared by the bisection locator
    pub fn normalized_single_line(&self) -> String {
        self.text.replace('\n', " ").trim().to_string()
    }
}

/// Lexical test for disabled code: statements and block braces do not
/// appear in prose debt comments
fn looks_like_source(text: &str) -> bool {
    text.contains('{') || text.contains(';')
}
