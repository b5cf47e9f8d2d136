//! Keyword debt predicate
//!
//! Default classifier: matches configured debt markers (TODO, FIXME,
//! HACK, ...) on word boundaries, case-insensitive.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::TrackerConfig;
use crate::errors::{Result, SatdError};
use crate::features::classification::ports::DebtPredicate;

/// Compiled pattern for the stock marker list
static DEFAULT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(todo|fixme|hack|xxx|kludge|workaround)\b")
        .expect("default marker pattern is valid")
});

/// Word-boundary keyword matcher
#[derive(Debug, Clone)]
pub struct KeywordDebtPredicate {
    pattern: Regex,
}

impl KeywordDebtPredicate {
    pub fn new(config: &TrackerConfig) -> Result<Self> {
        Self::from_markers(&config.debt_markers)
    }

    /// Compile a matcher for an explicit marker list
    pub fn from_markers(markers: &[String]) -> Result<Self> {
        if markers.is_empty() {
            return Err(SatdError::config("debt marker list must not be empty"));
        }
        let escaped: Vec<String> = markers.iter().map(|m| regex::escape(m)).collect();
        let pattern = format!(r"(?i)\b({})\b", escaped.join("|"));
        let pattern = Regex::new(&pattern)
            .map_err(|e| SatdError::config(format!("invalid debt marker pattern: {e}")))?;
        Ok(Self { pattern })
    }
}

impl Default for KeywordDebtPredicate {
    fn default() -> Self {
        Self {
            pattern: DEFAULT_PATTERN.clone(),
        }
    }
}

impl DebtPredicate for KeywordDebtPredicate {
    fn is_debt(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }
}
