//! Comment source port (interface)
//!
//! Defines the contract for language-specific comment extraction.

use crate::errors::Result;
use crate::features::comments::domain::GroupedComment;

/// Comment source trait - abstraction over the source parser
///
/// Implementations return grouped, mining-ready comment units ordered
/// by start line. A parse failure is reported as `SatdError::Parse`
/// carrying the file name; callers treat it as "no comments known for
/// this file version", never as a run abort.
pub trait CommentSource: Send + Sync {
    /// Extract grouped comments from one file version
    fn extract(&self, source: &str, file_path: &str) -> Result<Vec<GroupedComment>>;

    /// Check if this source supports the given file extension
    fn supports_extension(&self, ext: &str) -> bool;

    /// Get supported language name
    fn language_name(&self) -> &'static str;
}
