//! Commit-range bisection
//!
//! Pinpoints the single commit at which a tracked comment's presence
//! flips, given an ordered window of commits and a comment known to
//! exist at the older endpoint. Probes by normalized text equality and
//! classifies the flip from the edit between the adjacent pair.

use std::cell::Cell;
use std::path::Path;
use std::sync::Arc;

use git2::{ErrorCode, ObjectType, Oid, Repository};
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::TrackerConfig;
use crate::errors::{Result, SatdError};
use crate::features::comments::domain::GroupedComment;
use crate::features::comments::ports::CommentSource;
use crate::features::diffing::domain::ChangeKind;
use crate::features::diffing::infrastructure::{commit_chain, line_edits, CommitDiffer};
use crate::features::lineage::domain::{CommentSnapshot, Resolution, SatdInstance};
use crate::shared::models::CommitMeta;

/// One bisection outcome: the lineage record plus the commit that
/// produced it
#[derive(Debug, Clone, Serialize)]
pub struct LocatedResolution {
    pub commit: CommitMeta,
    pub instance: SatdInstance,
}

/// Binary-search locator over an ordered commit window
pub struct ResolutionLocator<'a> {
    repo: &'a Repository,
    source: Arc<dyn CommentSource>,
    config: &'a TrackerConfig,
    /// Oldest to newest, both endpoints included
    commits: Vec<Oid>,
    probe_count: Cell<usize>,
}

impl<'a> ResolutionLocator<'a> {
    /// Enumerate the window between two revisions, oldest first
    pub fn new(
        repo: &'a Repository,
        start_rev: &str,
        end_rev: &str,
        config: &'a TrackerConfig,
        source: Arc<dyn CommentSource>,
    ) -> Result<Self> {
        let commits = commit_chain(repo, start_rev, end_rev)?;
        if commits.len() < 2 {
            return Err(SatdError::config(
                "commit range must span at least two commits",
            ));
        }

        Ok(Self {
            repo,
            source,
            config,
            commits,
            probe_count: Cell::new(0),
        })
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }

    /// Probes issued since the last `locate_all` call
    pub fn probes(&self) -> usize {
        self.probe_count.get()
    }

    /// Locate the resolving commit for every comment of one file
    ///
    /// Failures are isolated per comment: a broken probe yields an
    /// ERROR_UNKNOWN record and the batch continues.
    pub fn locate_all(
        &self,
        start_path: &str,
        comments: &[GroupedComment],
    ) -> Result<Vec<LocatedResolution>> {
        self.probe_count.set(0);

        let paths = match self.build_path_map(start_path) {
            Ok(paths) => paths,
            Err(err) => {
                warn!(
                    file = start_path,
                    error = %err,
                    "path map construction failed, marking all comments unknown"
                );
                return comments
                    .iter()
                    .map(|c| self.error_record(start_path, c))
                    .collect();
            }
        };

        let mut located = Vec::with_capacity(comments.len());
        for comment in comments {
            match self.locate(&paths, comment) {
                Ok(result) => located.push(result),
                Err(err) => {
                    warn!(
                        file = start_path,
                        line = comment.start_line(),
                        error = %err,
                        "bisection failed for comment"
                    );
                    located.push(self.error_record(start_path, comment)?);
                }
            }
        }
        Ok(located)
    }

    /// Binary search for the first commit where the comment is absent
    fn locate(&self, paths: &[String], comment: &GroupedComment) -> Result<LocatedResolution> {
        let target = comment.normalized_single_line();
        let n = self.commits.len();

        let mut lo = 1usize;
        let mut hi = n;
        let mut last_present: Option<GroupedComment> = None;
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            match self.comment_match(mid, &paths[mid], &target)? {
                // Present probes advance lo, so the latest one is the
                // comment as seen at lo - 1
                Some(found) => {
                    last_present = Some(found);
                    lo = mid + 1;
                }
                None => hi = mid,
            }
        }
        debug!(
            line = comment.start_line(),
            first_absent = lo,
            probes = self.probe_count.get(),
            "bisection converged"
        );

        // When no probe ever saw the comment, lo - 1 is the older
        // endpoint, where the caller vouches for it
        let last_seen = last_present.unwrap_or_else(|| comment.clone());

        // Present through the newest endpoint: the debt was never
        // addressed inside this window
        if lo == n {
            return Ok(LocatedResolution {
                commit: self.meta_at(n - 1)?,
                instance: SatdInstance::new(
                    &paths[0],
                    CommentSnapshot::of(comment),
                    &paths[n - 1],
                    CommentSnapshot::of(&last_seen),
                    Resolution::SatdUnaddressed,
                ),
            });
        }

        self.classify_flip(paths, &last_seen, lo)
    }

    /// Classify the adjacent pair (last present, first absent)
    fn classify_flip(
        &self,
        paths: &[String],
        last_seen: &GroupedComment,
        first_absent: usize,
    ) -> Result<LocatedResolution> {
        let before = first_absent - 1;

        if paths[first_absent] != paths[before] {
            return Ok(LocatedResolution {
                commit: self.meta_at(first_absent)?,
                instance: SatdInstance::new(
                    &paths[before],
                    CommentSnapshot::of(last_seen),
                    &paths[first_absent],
                    CommentSnapshot::absent(),
                    Resolution::FilePathChanged,
                ),
            });
        }

        // Growth in the surviving range means the comment may have been
        // edited in place rather than deleted
        let old_content = self
            .content_or_none(self.commits[before], &paths[before])?
            .unwrap_or_default();
        let new_content = self
            .content_or_none(self.commits[first_absent], &paths[first_absent])?
            .unwrap_or_default();
        let edits = line_edits(&old_content, &new_content);
        let grew = edits
            .iter()
            .filter(|e| e.occurs_in_old(last_seen.start_line(), last_seen.end_line()))
            .any(|e| e.grows());

        let resolution = if grew {
            Resolution::SatdPossiblyRemoved
        } else {
            Resolution::SatdRemoved
        };

        Ok(LocatedResolution {
            commit: self.meta_at(first_absent)?,
            instance: SatdInstance::new(
                &paths[before],
                CommentSnapshot::of(last_seen),
                &paths[first_absent],
                CommentSnapshot::absent(),
                resolution,
            ),
        })
    }

    /// Per-commit path of the tracked file, following renames forward
    ///
    /// Trivial when the path still exists at the newest endpoint;
    /// otherwise rebuilt by replaying rename entries pair by pair.
    fn build_path_map(&self, start_path: &str) -> Result<Vec<String>> {
        let n = self.commits.len();
        if !self.config.detect_renames || self.path_exists(self.commits[n - 1], start_path)? {
            return Ok(vec![start_path.to_string(); n]);
        }

        let mut paths = Vec::with_capacity(n);
        let mut current = start_path.to_string();
        paths.push(current.clone());
        for i in 1..n {
            let differ = CommitDiffer::new(
                self.repo,
                &self.commits[i - 1].to_string(),
                &self.commits[i].to_string(),
                self.config,
                Arc::clone(&self.source),
            )?;
            if let Some(renamed) = differ
                .deltas()
                .iter()
                .find(|d| d.kind == ChangeKind::Renamed && d.old_path == current)
            {
                current = renamed.new_path.clone();
            }
            paths.push(current.clone());
        }
        Ok(paths)
    }

    /// Find a comment at the given commit whose normalized text equals
    /// the target. Missing files and unparsable snapshots count as
    /// absent.
    fn comment_match(
        &self,
        index: usize,
        path: &str,
        target: &str,
    ) -> Result<Option<GroupedComment>> {
        self.probe_count.set(self.probe_count.get() + 1);

        let content = match self.content_or_none(self.commits[index], path)? {
            Some(content) => content,
            None => return Ok(None),
        };
        let comments = match self.source.extract(&content, path) {
            Ok(comments) => comments,
            Err(err) => {
                warn!(file = path, commit = index, error = %err, "probe parse failed");
                return Ok(None);
            }
        };
        Ok(comments
            .into_iter()
            .find(|c| c.normalized_single_line() == target))
    }

    /// Blob content at a commit, None when the path does not exist
    fn content_or_none(&self, commit_id: Oid, path: &str) -> Result<Option<String>> {
        let commit = self.repo.find_commit(commit_id)?;
        let tree = commit.tree()?;
        let entry = match tree.get_path(Path::new(path)) {
            Ok(entry) => entry,
            Err(err) if err.code() == ErrorCode::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if entry.kind() != Some(ObjectType::Blob) {
            return Ok(None);
        }
        let blob = self.repo.find_blob(entry.id())?;
        match String::from_utf8(blob.content().to_vec()) {
            Ok(content) => Ok(Some(content)),
            Err(_) => {
                warn!(file = path, "blob is not valid utf-8, treating as absent");
                Ok(None)
            }
        }
    }

    fn path_exists(&self, commit_id: Oid, path: &str) -> Result<bool> {
        let commit = self.repo.find_commit(commit_id)?;
        let tree = commit.tree()?;
        match tree.get_path(Path::new(path)) {
            Ok(_) => Ok(true),
            Err(err) if err.code() == ErrorCode::NotFound => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    fn meta_at(&self, index: usize) -> Result<CommitMeta> {
        let commit = self.repo.find_commit(self.commits[index])?;
        Ok(CommitMeta::from_commit(&commit))
    }

    /// Fallback record when a comment's search could not complete.
    /// Attributed to the newest endpoint since no resolving commit was
    /// determined.
    fn error_record(
        &self,
        start_path: &str,
        comment: &GroupedComment,
    ) -> Result<LocatedResolution> {
        Ok(LocatedResolution {
            commit: self.meta_at(self.commits.len() - 1)?,
            instance: SatdInstance::new(
                start_path,
                CommentSnapshot::of(comment),
                start_path,
                CommentSnapshot::absent(),
                Resolution::ErrorUnknown,
            ),
        })
    }
}
