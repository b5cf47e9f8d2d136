//! Tracker Configuration
//!
//! Centralized configuration for SATD mining. All thresholds and word
//! lists are carried here and passed into the resolver at construction;
//! nothing is read from process-wide state.

use crate::errors::{Result, SatdError};

/// SATD tracker configuration
///
/// # Example
/// ```
/// use satd_core::config::TrackerConfig;
///
/// let config = TrackerConfig::new()
///     .with_similarity_threshold(0.4)
///     .with_source_suffix(".java");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Normalized Levenshtein threshold for "same comment, edited"
    /// decisions (0.0-1.0). Lower is stricter.
    pub similarity_threshold: f64,

    /// Comments containing any of these words (case-insensitive) are
    /// dropped during extraction. Tool-emitted noise such as
    /// "TODO Auto-generated method stub" lands here.
    pub ignorable_words: Vec<String>,

    /// Keyword markers the default debt predicate matches on word
    /// boundaries, case-insensitive.
    pub debt_markers: Vec<String>,

    /// Tracked source-file suffix; diffs are filtered to it.
    pub source_suffix: String,

    /// Report delete+add pairs with high textual similarity as
    /// RENAME/COPY instead of two unrelated entries.
    pub detect_renames: bool,
}

impl TrackerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the similarity threshold
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Override the ignorable-word list
    pub fn with_ignorable_words(mut self, words: Vec<String>) -> Self {
        self.ignorable_words = words;
        self
    }

    /// Override the debt marker list
    pub fn with_debt_markers(mut self, markers: Vec<String>) -> Self {
        self.debt_markers = markers;
        self
    }

    /// Override the tracked source suffix (e.g., ".java")
    pub fn with_source_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.source_suffix = suffix.into();
        self
    }

    /// Enable or disable rename detection
    pub fn with_rename_detection(mut self, enabled: bool) -> Self {
        self.detect_renames = enabled;
        self
    }

    /// Validate field values; rejected configurations never reach the
    /// resolver.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_threshold) {
            return Err(SatdError::config(format!(
                "similarity threshold must be between 0.0 and 1.0, got {}",
                self.similarity_threshold
            )));
        }
        if !self.source_suffix.starts_with('.') || self.source_suffix.len() < 2 {
            return Err(SatdError::config(format!(
                "source suffix must look like '.ext', got '{}'",
                self.source_suffix
            )));
        }
        if self.debt_markers.is_empty() {
            return Err(SatdError::config("debt marker list must not be empty"));
        }
        if self.debt_markers.iter().any(|m| m.trim().is_empty()) {
            return Err(SatdError::config("debt markers must not be blank"));
        }
        Ok(())
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.5,
            ignorable_words: vec![
                "auto-generated".to_string(),
                "generated by".to_string(),
                "copyright".to_string(),
                "license".to_string(),
            ],
            debt_markers: vec![
                "todo".to_string(),
                "fixme".to_string(),
                "hack".to_string(),
                "xxx".to_string(),
                "kludge".to_string(),
                "workaround".to_string(),
            ],
            source_suffix: ".java".to_string(),
            detect_renames: true,
        }
    }
}
