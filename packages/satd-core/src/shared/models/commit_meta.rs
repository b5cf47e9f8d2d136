//! Commit metadata captured alongside each resolved batch

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata of the newer commit of a resolved pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitMeta {
    /// Full commit hash
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    pub authored_at: DateTime<Utc>,
    pub committed_at: DateTime<Utc>,
    /// First line of the commit message
    pub summary: String,
}

impl CommitMeta {
    /// Capture metadata from a resolved git2 commit
    pub fn from_commit(commit: &git2::Commit<'_>) -> Self {
        let author = commit.author();
        Self {
            hash: commit.id().to_string(),
            author_name: author.name().unwrap_or("").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            authored_at: timestamp_utc(author.when().seconds()),
            committed_at: timestamp_utc(commit.time().seconds()),
            summary: commit.summary().unwrap_or("").to_string(),
        }
    }
}

/// Seconds since epoch to UTC datetime; clamps out-of-range values
fn timestamp_utc(seconds: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(seconds, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_conversion() {
        let ts = timestamp_utc(1_700_000_000);
        assert_eq!(ts.timestamp(), 1_700_000_000);
    }

    #[test]
    fn test_out_of_range_timestamp_clamps() {
        let ts = timestamp_utc(i64::MAX);
        assert_eq!(ts, DateTime::<Utc>::MIN_UTC);
    }
}
