//! Error types for satd-core
//!
//! Provides unified error handling across the crate.

use thiserror::Error;

/// Main error type for SATD mining operations
#[derive(Debug, Error)]
pub enum SatdError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A single source file could not be parsed. Recorded per-file;
    /// the affected file version simply contributes no comments.
    #[error("Parse error in '{file}': {message}")]
    Parse { file: String, message: String },

    /// Git object store read failure. Fatal for the current commit pair
    /// only; the caller decides whether to skip or abort the batch.
    #[error("Git access error: {0}")]
    GitAccess(String),

    /// Invalid configuration, rejected before any mining starts.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl SatdError {
    /// Create a parse error for a specific file
    pub fn parse(file: impl Into<String>, message: impl Into<String>) -> Self {
        SatdError::Parse {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a git access error
    pub fn git(msg: impl Into<String>) -> Self {
        SatdError::GitAccess(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        SatdError::Config(msg.into())
    }
}

impl From<git2::Error> for SatdError {
    fn from(err: git2::Error) -> Self {
        SatdError::GitAccess(err.message().to_string())
    }
}

/// Result type alias for SATD mining operations
pub type Result<T> = std::result::Result<T, SatdError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = SatdError::parse("Foo.java", "unexpected token");
        assert_eq!(
            err.to_string(),
            "Parse error in 'Foo.java': unexpected token"
        );
    }

    #[test]
    fn test_git_error_from_git2() {
        let git_err = git2::Error::from_str("object not found");
        let err: SatdError = git_err.into();
        assert!(matches!(err, SatdError::GitAccess(_)));
        assert!(err.to_string().contains("object not found"));
    }

    #[test]
    fn test_config_error_display() {
        let err = SatdError::config("threshold out of range");
        assert_eq!(
            err.to_string(),
            "Configuration error: threshold out of range"
        );
    }
}
