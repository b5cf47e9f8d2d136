//! Mining session over one repository
//!
//! The high-level entry point tying the pieces together: diff a commit
//! pair, resolve every known debt comment across it, thread lineage
//! ids, and (in range mode) bisect whole commit windows. One session
//! owns one repository handle plus the id state; sessions are
//! independent, so separate repositories can be mined from separate
//! threads.
//!
//! # Example
//!
//! ```rust,ignore
//! use satd_core::config::TrackerConfig;
//! use satd_core::usecases::MiningSession;
//!
//! let mut session = MiningSession::open("/work/repo", TrackerConfig::default())?;
//! for (old, new) in session.pair_revs("v1.0", "HEAD")? {
//!     let outcome = session.resolve_pair(&old, &new)?;
//!     println!("{}: {} records", outcome.meta.hash, outcome.instances.len());
//! }
//! ```

use std::path::Path;
use std::sync::Arc;

use git2::{ObjectType, Repository, TreeWalkMode, TreeWalkResult};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::errors::Result;
use crate::features::bisection::application::{LocatedResolution, ResolutionLocator};
use crate::features::classification::infrastructure::KeywordDebtPredicate;
use crate::features::classification::ports::DebtPredicate;
use crate::features::comments::infrastructure::JavaCommentSource;
use crate::features::comments::ports::CommentSource;
use crate::features::diffing::infrastructure::{
    commit_chain, content_at, resolve_commit, CommitDiffer,
};
use crate::features::lineage::application::{LineageTracker, PairResolver};
use crate::features::lineage::domain::SatdInstance;
use crate::shared::models::CommitMeta;

/// Resolved records for one commit pair
#[derive(Debug, Clone, Serialize)]
pub struct PairOutcome {
    /// Older commit of the pair
    pub old_hash: String,
    /// Metadata of the newer commit, the one the records resolve at
    pub meta: CommitMeta,
    pub instances: Vec<SatdInstance>,
}

/// One repository's mining state
pub struct MiningSession {
    repo: Repository,
    config: TrackerConfig,
    source: Arc<dyn CommentSource>,
    predicate: Box<dyn DebtPredicate>,
    tracker: LineageTracker,
}

impl MiningSession {
    /// Open a repository and wire the default collaborators
    pub fn open(repo_path: impl AsRef<Path>, config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        let repo = Repository::open(repo_path.as_ref())?;
        let source = Arc::new(JavaCommentSource::new(&config));
        let predicate = Box::new(KeywordDebtPredicate::new(&config)?);
        Ok(Self {
            repo,
            config,
            source,
            predicate,
            tracker: LineageTracker::new(),
        })
    }

    pub fn with_source(mut self, source: Arc<dyn CommentSource>) -> Self {
        self.source = source;
        self
    }

    pub fn with_predicate(mut self, predicate: Box<dyn DebtPredicate>) -> Self {
        self.predicate = predicate;
        self
    }

    /// Adjacent (old, new) revision pairs spanning a commit range
    pub fn pair_revs(&self, start_rev: &str, end_rev: &str) -> Result<Vec<(String, String)>> {
        let chain = commit_chain(&self.repo, start_rev, end_rev)?;
        Ok(chain
            .windows(2)
            .map(|w| (w[0].to_string(), w[1].to_string()))
            .collect())
    }

    /// Resolve every debt comment across one commit pair
    ///
    /// Old-side records come first, delta by delta, then the new-side
    /// SATD_ADDED records of the same delta. Lineage ids are threaded
    /// before the batch is returned.
    pub fn resolve_pair(&mut self, old_rev: &str, new_rev: &str) -> Result<PairOutcome> {
        let differ = CommitDiffer::new(
            &self.repo,
            old_rev,
            new_rev,
            &self.config,
            Arc::clone(&self.source),
        )?;
        let resolver = PairResolver::new(&differ, self.predicate.as_ref(), &self.config);

        let mut instances = Vec::new();
        for delta in differ.deltas() {
            if delta.has_old_side() {
                for comment in differ.comments_in_old(&delta.old_path)? {
                    if !self.predicate.is_debt(&comment.text) {
                        continue;
                    }
                    instances.extend(resolver.resolve_old_side(delta, &comment)?);
                }
            }
            instances.extend(resolver.resolve_new_side(delta)?);
        }

        let meta = differ.new_commit_meta()?;
        let old_hash = differ.old_id().to_string();
        debug!(
            old = old_hash.as_str(),
            new = meta.hash.as_str(),
            deltas = differ.deltas().len(),
            records = instances.len(),
            "commit pair resolved"
        );

        let instances = self.tracker.assign(instances);
        Ok(PairOutcome {
            old_hash,
            meta,
            instances,
        })
    }

    /// Range mode: bisect every debt comment of the older endpoint
    ///
    /// Mines all tracked source files at the start commit, then runs
    /// the bisection locator per file. Per-comment failures surface as
    /// ERROR_UNKNOWN records inside the result, not as an error.
    pub fn locate_in_range(
        &mut self,
        start_rev: &str,
        end_rev: &str,
    ) -> Result<Vec<LocatedResolution>> {
        let locator = ResolutionLocator::new(
            &self.repo,
            start_rev,
            end_rev,
            &self.config,
            Arc::clone(&self.source),
        )?;
        let start_id = resolve_commit(&self.repo, start_rev)?.id();
        let files = self.source_files_at(start_rev)?;
        info!(
            commits = locator.commit_count(),
            files = files.len(),
            "bisecting commit range"
        );

        let mut located = Vec::new();
        for path in files {
            let content = match content_at(&self.repo, start_id, &path) {
                Ok(content) => content,
                Err(err) => {
                    warn!(file = path.as_str(), error = %err, "skipping unreadable file");
                    continue;
                }
            };
            let comments = match self.source.extract(&content, &path) {
                Ok(comments) => comments,
                Err(err) => {
                    warn!(file = path.as_str(), error = %err, "skipping unparsable file");
                    continue;
                }
            };
            let debt: Vec<_> = comments
                .into_iter()
                .filter(|c| self.predicate.is_debt(&c.text))
                .collect();
            if debt.is_empty() {
                continue;
            }
            located.extend(locator.locate_all(&path, &debt)?);
        }

        // Thread ids through the located batch as well so range output
        // lines up with pair output downstream
        let (commits, instances): (Vec<_>, Vec<_>) = located
            .into_iter()
            .map(|l| (l.commit, l.instance))
            .unzip();
        let instances = self.tracker.assign(instances);
        Ok(commits
            .into_iter()
            .zip(instances)
            .map(|(commit, instance)| LocatedResolution { commit, instance })
            .collect())
    }

    /// Tracked source files present in one commit's tree
    fn source_files_at(&self, rev: &str) -> Result<Vec<String>> {
        let commit = resolve_commit(&self.repo, rev)?;
        let tree = commit.tree()?;
        let suffix = self.config.source_suffix.clone();

        let mut files = Vec::new();
        tree.walk(TreeWalkMode::PreOrder, |root, entry| {
            if entry.kind() == Some(ObjectType::Blob) {
                if let Some(name) = entry.name() {
                    if name.ends_with(&suffix) {
                        files.push(format!("{root}{name}"));
                    }
                }
            }
            TreeWalkResult::Ok
        })?;
        Ok(files)
    }
}
