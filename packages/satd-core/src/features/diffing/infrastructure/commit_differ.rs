//! Commit-pair differ
//!
//! Git-backed diff entry classifier for one pair of commits: resolves
//! the two trees, lists changed source files with rename detection, and
//! serves file content and line-level edit lists on demand. Owns the
//! per-pair comment cache for the newer snapshot; the cache dies with
//! the differ and never leaks across pairs or repositories.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use git2::{Delta, DiffDelta, DiffFindOptions, DiffOptions, Oid, Repository};
use similar::{DiffTag, TextDiff};
use tracing::warn;

use crate::config::TrackerConfig;
use crate::errors::{Result, SatdError};
use crate::features::comments::domain::GroupedComment;
use crate::features::comments::ports::CommentSource;
use crate::features::diffing::domain::{ChangeKind, Edit, FileDelta};
use crate::shared::models::CommitMeta;

/// Diff entry classifier for a single commit pair
pub struct CommitDiffer<'repo> {
    repo: &'repo Repository,
    old_id: Oid,
    new_id: Oid,
    deltas: Vec<FileDelta>,
    source: Arc<dyn CommentSource>,
    /// Memoized comment extraction for the newer snapshot, keyed by
    /// path. Scoped to this differ instance.
    comment_cache: RefCell<HashMap<String, Vec<GroupedComment>>>,
}

impl<'repo> CommitDiffer<'repo> {
    /// Resolve both revisions and compute the filtered delta list
    pub fn new(
        repo: &'repo Repository,
        old_rev: &str,
        new_rev: &str,
        config: &TrackerConfig,
        source: Arc<dyn CommentSource>,
    ) -> Result<Self> {
        let old_commit = resolve_commit(repo, old_rev)?;
        let new_commit = resolve_commit(repo, new_rev)?;

        let old_tree = old_commit.tree()?;
        let new_tree = new_commit.tree()?;

        let mut diff_opts = DiffOptions::new();
        let mut diff =
            repo.diff_tree_to_tree(Some(&old_tree), Some(&new_tree), Some(&mut diff_opts))?;

        if config.detect_renames {
            let mut find_opts = DiffFindOptions::new();
            find_opts.renames(true).copies(true);
            diff.find_similar(Some(&mut find_opts))?;
        }

        let suffix = config.source_suffix.clone();
        let mut deltas = Vec::new();
        diff.foreach(
            &mut |delta: DiffDelta, _progress| {
                if let Some(mapped) = map_delta(&delta, &suffix) {
                    deltas.push(mapped);
                }
                true
            },
            None,
            None,
            None,
        )?;

        Ok(Self {
            repo,
            old_id: old_commit.id(),
            new_id: new_commit.id(),
            deltas,
            source,
            comment_cache: RefCell::new(HashMap::new()),
        })
    }

    /// Changed source files between the two commits
    pub fn deltas(&self) -> &[FileDelta] {
        &self.deltas
    }

    /// Old-side paths of all deltas that have an old side
    pub fn paths_in_old(&self) -> Vec<String> {
        self.deltas
            .iter()
            .filter(|d| d.has_old_side())
            .map(|d| d.old_path.clone())
            .collect()
    }

    /// New-side paths of all deltas that have a new side
    pub fn paths_in_new(&self) -> Vec<String> {
        self.deltas
            .iter()
            .filter(|d| d.has_new_side())
            .map(|d| d.new_path.clone())
            .collect()
    }

    pub fn old_id(&self) -> Oid {
        self.old_id
    }

    pub fn new_id(&self) -> Oid {
        self.new_id
    }

    /// Metadata of the newer commit, captured once per resolved batch
    pub fn new_commit_meta(&self) -> Result<CommitMeta> {
        let commit = self.repo.find_commit(self.new_id)?;
        Ok(CommitMeta::from_commit(&commit))
    }

    /// File content at the older commit
    pub fn content_in_old(&self, path: &str) -> Result<String> {
        content_at(self.repo, self.old_id, path)
    }

    /// File content at the newer commit
    pub fn content_in_new(&self, path: &str) -> Result<String> {
        content_at(self.repo, self.new_id, path)
    }

    /// Line-level edit list for one delta's file pair
    pub fn edits_for(&self, delta: &FileDelta) -> Result<Vec<Edit>> {
        let old_text = self.content_in_old(&delta.old_path)?;
        let new_text = self.content_in_new(&delta.new_path)?;
        Ok(line_edits(&old_text, &new_text))
    }

    /// Grouped comments of one old-side file version
    ///
    /// A parse failure degrades to an empty set; git failures propagate.
    pub fn comments_in_old(&self, path: &str) -> Result<Vec<GroupedComment>> {
        let text = self.content_in_old(path)?;
        Ok(self.extract_or_empty(&text, path))
    }

    /// Grouped comments of one new-side file version, memoized
    ///
    /// Revisited once per old-side comment mapping into the same file;
    /// a cache miss extracts, a hit returns the stored sequence.
    pub fn comments_in_new(&self, path: &str) -> Result<Vec<GroupedComment>> {
        if let Some(cached) = self.comment_cache.borrow().get(path) {
            return Ok(cached.clone());
        }
        let text = self.content_in_new(path)?;
        let comments = self.extract_or_empty(&text, path);
        self.comment_cache
            .borrow_mut()
            .insert(path.to_string(), comments.clone());
        Ok(comments)
    }

    fn extract_or_empty(&self, text: &str, path: &str) -> Vec<GroupedComment> {
        match self.source.extract(text, path) {
            Ok(comments) => comments,
            Err(e) => {
                warn!(file = path, error = %e, "comment extraction failed, treating file as comment-free");
                Vec::new()
            }
        }
    }
}

/// Resolve a revision string (branch, SHA, HEAD~n) to a commit
pub fn resolve_commit<'repo>(repo: &'repo Repository, rev: &str) -> Result<git2::Commit<'repo>> {
    let obj = repo
        .revparse_single(rev)
        .map_err(|e| SatdError::git(format!("failed to resolve '{}': {}", rev, e.message())))?;
    obj.peel_to_commit()
        .map_err(|e| SatdError::git(format!("'{}' is not a commit: {}", rev, e.message())))
}

/// File content at an arbitrary commit
pub fn content_at(repo: &Repository, commit_id: Oid, path: &str) -> Result<String> {
    let commit = repo.find_commit(commit_id)?;
    let tree = commit.tree()?;
    let entry = tree.get_path(Path::new(path))?;
    let blob = repo.find_blob(entry.id())?;
    String::from_utf8(blob.content().to_vec())
        .map_err(|_| SatdError::git(format!("file '{}' is not valid UTF-8", path)))
}

/// Ordered commit chain between two revisions, oldest first, both
/// endpoints included. The start revision must be an ancestor of the
/// end revision.
pub fn commit_chain(repo: &Repository, start_rev: &str, end_rev: &str) -> Result<Vec<Oid>> {
    let start = resolve_commit(repo, start_rev)?.id();
    let end = resolve_commit(repo, end_rev)?.id();

    let mut walker = repo.revwalk()?;
    walker.push(end)?;
    walker.hide(start)?;
    walker.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::REVERSE)?;

    let mut chain = vec![start];
    for oid in walker {
        chain.push(oid?);
    }
    Ok(chain)
}

/// Line-level edits between two file versions
pub fn line_edits(old: &str, new: &str) -> Vec<Edit> {
    TextDiff::from_lines(old, new)
        .ops()
        .iter()
        .filter(|op| op.tag() != DiffTag::Equal)
        .map(|op| {
            Edit::new(
                op.old_range().start as u32,
                op.old_range().end as u32,
                op.new_range().start as u32,
                op.new_range().end as u32,
            )
        })
        .collect()
}

fn map_delta(delta: &DiffDelta<'_>, suffix: &str) -> Option<FileDelta> {
    let kind = match delta.status() {
        Delta::Added => ChangeKind::Added,
        Delta::Deleted => ChangeKind::Deleted,
        Delta::Modified => ChangeKind::Modified,
        Delta::Renamed => ChangeKind::Renamed,
        Delta::Copied => ChangeKind::Copied,
        _ => return None,
    };

    let old_path = delta
        .old_file()
        .path()
        .map(|p| p.to_string_lossy().to_string());
    let new_path = delta
        .new_file()
        .path()
        .map(|p| p.to_string_lossy().to_string());

    let (old_path, new_path) = match kind {
        ChangeKind::Added => {
            let p = new_path?;
            (p.clone(), p)
        }
        ChangeKind::Deleted => {
            let p = old_path?;
            (p.clone(), p)
        }
        _ => (old_path?, new_path?),
    };

    if !old_path.ends_with(suffix) && !new_path.ends_with(suffix) {
        return None;
    }

    Some(FileDelta {
        old_path,
        new_path,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use std::process::Command;

    use crate::features::comments::infrastructure::JavaCommentSource;

    /// Helper to create a temporary git repo for testing
    fn create_temp_repo() -> (tempfile::TempDir, PathBuf) {
        let temp_dir = tempfile::tempdir().unwrap();
        let repo_path = temp_dir.path().to_path_buf();

        Command::new("git")
            .args(["init"])
            .current_dir(&repo_path)
            .output()
            .expect("Failed to init git repo");

        Command::new("git")
            .args(["config", "user.email", "test@test.com"])
            .current_dir(&repo_path)
            .output()
            .unwrap();

        Command::new("git")
            .args(["config", "user.name", "Test"])
            .current_dir(&repo_path)
            .output()
            .unwrap();

        (temp_dir, repo_path)
    }

    /// Helper to create a commit with a file
    fn create_commit(repo_path: &Path, filename: &str, content: &str, message: &str) {
        let file_path = repo_path.join(filename);
        fs::write(&file_path, content).unwrap();

        Command::new("git")
            .args(["add", "."])
            .current_dir(repo_path)
            .output()
            .unwrap();

        Command::new("git")
            .args(["commit", "-m", message])
            .current_dir(repo_path)
            .output()
            .unwrap();
    }

    /// Helper to remove a file and commit
    fn delete_and_commit(repo_path: &Path, filename: &str, message: &str) {
        Command::new("git")
            .args(["rm", filename])
            .current_dir(repo_path)
            .output()
            .unwrap();

        Command::new("git")
            .args(["commit", "-m", message])
            .current_dir(repo_path)
            .output()
            .unwrap();
    }

    /// Helper to rename a file and commit
    fn rename_and_commit(repo_path: &Path, from: &str, to: &str, message: &str) {
        Command::new("git")
            .args(["mv", from, to])
            .current_dir(repo_path)
            .output()
            .unwrap();

        Command::new("git")
            .args(["commit", "-m", message])
            .current_dir(repo_path)
            .output()
            .unwrap();
    }

    fn differ<'a>(repo: &'a Repository, config: &TrackerConfig) -> CommitDiffer<'a> {
        let source = Arc::new(JavaCommentSource::new(config));
        CommitDiffer::new(repo, "HEAD~1", "HEAD", config, source).unwrap()
    }

    const BASE: &str = "\
public class Foo {
    public void bar() {
        // TODO fix this
        run();
    }
}
";

    #[test]
    fn test_modified_file_delta_and_edits() {
        let (_tmp, path) = create_temp_repo();
        create_commit(&path, "Foo.java", BASE, "base");
        create_commit(
            &path,
            "Foo.java",
            "\
public class Foo {
    public void bar() {
        run();
    }
}
",
            "drop comment",
        );

        let repo = Repository::open(&path).unwrap();
        let config = TrackerConfig::default();
        let differ = differ(&repo, &config);

        assert_eq!(differ.deltas().len(), 1);
        let delta = &differ.deltas()[0];
        assert_eq!(delta.kind, ChangeKind::Modified);
        assert_eq!(delta.old_path, "Foo.java");

        let edits = differ.edits_for(delta).unwrap();
        assert_eq!(edits.len(), 1);
        // Line 3 (1-based) was deleted: begin index 2, exclusive end 3
        assert_eq!(edits[0], Edit::new(2, 3, 2, 2));
        assert!(edits[0].occurs_in_old(3, 3));
    }

    #[test]
    fn test_added_and_deleted_deltas() {
        let (_tmp, path) = create_temp_repo();
        create_commit(&path, "Foo.java", BASE, "base");
        create_commit(&path, "Bar.java", "public class Bar {}\n", "add Bar");

        let repo = Repository::open(&path).unwrap();
        let config = TrackerConfig::default();
        let d = differ(&repo, &config);
        assert_eq!(d.deltas().len(), 1);
        assert_eq!(d.deltas()[0].kind, ChangeKind::Added);
        assert_eq!(d.deltas()[0].new_path, "Bar.java");
        drop(d);

        delete_and_commit(&path, "Foo.java", "remove Foo");
        let d = differ(&repo, &config);
        assert_eq!(d.deltas().len(), 1);
        assert_eq!(d.deltas()[0].kind, ChangeKind::Deleted);
        assert_eq!(d.deltas()[0].old_path, "Foo.java");
    }

    #[test]
    fn test_rename_is_detected() {
        let (_tmp, path) = create_temp_repo();
        create_commit(&path, "Foo.java", BASE, "base");
        rename_and_commit(&path, "Foo.java", "Bar.java", "rename");

        let repo = Repository::open(&path).unwrap();
        let config = TrackerConfig::default();
        let d = differ(&repo, &config);

        assert_eq!(d.deltas().len(), 1);
        let delta = &d.deltas()[0];
        assert_eq!(delta.kind, ChangeKind::Renamed);
        assert_eq!(delta.old_path, "Foo.java");
        assert_eq!(delta.new_path, "Bar.java");
    }

    #[test]
    fn test_rename_detection_can_be_disabled() {
        let (_tmp, path) = create_temp_repo();
        create_commit(&path, "Foo.java", BASE, "base");
        rename_and_commit(&path, "Foo.java", "Bar.java", "rename");

        let repo = Repository::open(&path).unwrap();
        let config = TrackerConfig::default().with_rename_detection(false);
        let d = differ(&repo, &config);

        let kinds: Vec<ChangeKind> = d.deltas().iter().map(|d| d.kind).collect();
        assert!(kinds.contains(&ChangeKind::Added));
        assert!(kinds.contains(&ChangeKind::Deleted));
    }

    #[test]
    fn test_suffix_filter_excludes_other_files() {
        let (_tmp, path) = create_temp_repo();
        create_commit(&path, "Foo.java", BASE, "base");
        create_commit(&path, "notes.txt", "scratch\n", "add notes");

        let repo = Repository::open(&path).unwrap();
        let config = TrackerConfig::default();
        let d = differ(&repo, &config);
        assert!(d.deltas().is_empty());
    }

    #[test]
    fn test_content_at_both_commits() {
        let (_tmp, path) = create_temp_repo();
        create_commit(&path, "Foo.java", BASE, "base");
        create_commit(&path, "Foo.java", "public class Foo {}\n", "rewrite");

        let repo = Repository::open(&path).unwrap();
        let config = TrackerConfig::default();
        let d = differ(&repo, &config);

        assert_eq!(d.content_in_old("Foo.java").unwrap(), BASE);
        assert_eq!(d.content_in_new("Foo.java").unwrap(), "public class Foo {}\n");
        assert!(d.content_in_new("Missing.java").is_err());
    }

    #[test]
    fn test_new_side_comments_are_memoized() {
        let (_tmp, path) = create_temp_repo();
        create_commit(&path, "Foo.java", "public class Foo {}\n", "base");
        create_commit(&path, "Foo.java", BASE, "add todo");

        let repo = Repository::open(&path).unwrap();
        let config = TrackerConfig::default();
        let d = differ(&repo, &config);

        let first = d.comments_in_new("Foo.java").unwrap();
        let second = d.comments_in_new("Foo.java").unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
        assert_eq!(d.comment_cache.borrow().len(), 1);
    }

    #[test]
    fn test_commit_meta_captures_newer_commit() {
        let (_tmp, path) = create_temp_repo();
        create_commit(&path, "Foo.java", "public class Foo {}\n", "base");
        create_commit(&path, "Foo.java", BASE, "add todo");

        let repo = Repository::open(&path).unwrap();
        let config = TrackerConfig::default();
        let d = differ(&repo, &config);

        let meta = d.new_commit_meta().unwrap();
        assert_eq!(meta.summary, "add todo");
        assert_eq!(meta.author_name, "Test");
        assert_eq!(meta.hash, d.new_id().to_string());
    }
}
