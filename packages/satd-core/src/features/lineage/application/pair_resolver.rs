//! Commit-pair resolution policies
//!
//! Decides the fate of every tracked comment across one file delta.
//! The old-side policy walks a state machine keyed by the delta kind;
//! the new-side policy detects newly introduced debt. Terminal rule for
//! modified files: exactly one record per touched old comment.

use tracing::debug;

use crate::config::TrackerConfig;
use crate::errors::Result;
use crate::features::classification::ports::DebtPredicate;
use crate::features::comments::domain::GroupedComment;
use crate::features::diffing::domain::{ChangeKind, Edit, FileDelta};
use crate::features::diffing::infrastructure::CommitDiffer;
use crate::features::lineage::domain::{are_similar, CommentSnapshot, Resolution, SatdInstance};

/// Resolution policies for one commit pair
pub struct PairResolver<'a> {
    differ: &'a CommitDiffer<'a>,
    predicate: &'a dyn DebtPredicate,
    config: &'a TrackerConfig,
}

impl<'a> PairResolver<'a> {
    pub fn new(
        differ: &'a CommitDiffer<'a>,
        predicate: &'a dyn DebtPredicate,
        config: &'a TrackerConfig,
    ) -> Self {
        Self {
            differ,
            predicate,
            config,
        }
    }

    /// Old-side policy: what happened to one known comment
    ///
    /// Returns no records when the comment survived untouched, one
    /// terminal record otherwise. Moved-file ambiguity is the single
    /// exception: verbatim duplicates can legitimately yield several
    /// records for one ancestor.
    pub fn resolve_old_side(
        &self,
        delta: &FileDelta,
        old_comment: &GroupedComment,
    ) -> Result<Vec<SatdInstance>> {
        match delta.kind {
            ChangeKind::Deleted => Ok(vec![SatdInstance::new(
                &delta.old_path,
                CommentSnapshot::of(old_comment),
                &delta.new_path,
                CommentSnapshot::absent(),
                Resolution::FileRemoved,
            )]),
            ChangeKind::Renamed | ChangeKind::Copied => self.resolve_renamed(delta, old_comment),
            ChangeKind::Modified => self.resolve_modified(delta, old_comment),
            // An added file has no old side to resolve
            ChangeKind::Added => Ok(Vec::new()),
        }
    }

    /// RENAME/COPY: the debt either rode along or its text was lost
    fn resolve_renamed(
        &self,
        delta: &FileDelta,
        old_comment: &GroupedComment,
    ) -> Result<Vec<SatdInstance>> {
        let new_comments = self.differ.comments_in_new(&delta.new_path)?;
        let survivor = new_comments.iter().find(|c| {
            c.text == old_comment.text && c.containing_method == old_comment.containing_method
        });

        let record = match survivor {
            Some(found) => SatdInstance::new(
                &delta.old_path,
                CommentSnapshot::of(old_comment),
                &delta.new_path,
                CommentSnapshot::of(found),
                Resolution::FilePathChanged,
            ),
            // The path changed but the text did not survive: record the
            // content loss, not the rename
            None => SatdInstance::new(
                &delta.old_path,
                CommentSnapshot::of(old_comment),
                &delta.new_path,
                CommentSnapshot::absent(),
                Resolution::SatdRemoved,
            ),
        };
        Ok(vec![record])
    }

    /// MODIFY: the core state machine
    fn resolve_modified(
        &self,
        delta: &FileDelta,
        old_comment: &GroupedComment,
    ) -> Result<Vec<SatdInstance>> {
        let edits = self.differ.edits_for(delta)?;
        let touching: Vec<&Edit> = edits
            .iter()
            .filter(|e| e.occurs_in_old(old_comment.start_line(), old_comment.end_line()))
            .collect();

        // Untouched comment: survival is implicit, emit nothing
        if touching.is_empty() {
            return Ok(Vec::new());
        }

        let new_comments = self.differ.comments_in_new(&delta.new_path)?;

        // Container-rename check runs first and wins over the other
        // outcomes: identical text under a renamed class/method means
        // the comment itself did not change
        if let Some(record) =
            self.container_changed(delta, old_comment, &edits, &new_comments)
        {
            return Ok(vec![record]);
        }

        // Candidate comments under a touching edit's new-side bounds,
        // widened by slack for candidates that shrank
        let candidates: Vec<&GroupedComment> = new_comments
            .iter()
            .filter(|c| {
                let slack = old_comment
                    .range
                    .line_count()
                    .saturating_sub(c.range.line_count());
                touching
                    .iter()
                    .any(|e| e.occurs_in_new_with_slack(c.start_line(), c.end_line(), slack))
            })
            .collect();

        // An identical candidate means the comment rode the edit out
        // (boundary touch or line shift), not a resolution
        if candidates.iter().any(|c| c.text == old_comment.text) {
            debug!(
                file = delta.new_path.as_str(),
                line = old_comment.start_line(),
                "comment survived intersecting edit verbatim"
            );
            return Ok(Vec::new());
        }

        if candidates.is_empty() {
            let moved = self.find_moved(delta, old_comment)?;
            if !moved.is_empty() {
                return Ok(moved);
            }
            return Ok(vec![SatdInstance::new(
                &delta.old_path,
                CommentSnapshot::of(old_comment),
                &delta.new_path,
                CommentSnapshot::absent(),
                Resolution::SatdRemoved,
            )]);
        }

        // Candidates exist and none is identical: the first one still
        // admitting debt is the evolved comment, same-method first
        let mut ordered = candidates;
        ordered.sort_by_key(|c| {
            (
                c.containing_method != old_comment.containing_method,
                c.start_line(),
            )
        });

        for candidate in ordered {
            if self.predicate.is_debt(&candidate.text) {
                return Ok(vec![SatdInstance::new(
                    &delta.old_path,
                    CommentSnapshot::of(old_comment),
                    &delta.new_path,
                    CommentSnapshot::of(candidate),
                    Resolution::SatdChanged,
                )]);
            }
        }

        // A comment remains but the debt-marking substring is gone
        Ok(vec![SatdInstance::new(
            &delta.old_path,
            CommentSnapshot::of(old_comment),
            &delta.new_path,
            CommentSnapshot::absent(),
            Resolution::SatdRemoved,
        )])
    }

    /// Identical text under a renamed container
    ///
    /// Applies when the old comment had no resolvable container or an
    /// edit touched its class/method declaration lines. The match must
    /// sit under a differently-named container whose own declaration
    /// lines were edited in this diff.
    fn container_changed(
        &self,
        delta: &FileDelta,
        old_comment: &GroupedComment,
        edits: &[Edit],
        new_comments: &[GroupedComment],
    ) -> Option<SatdInstance> {
        let no_container = !old_comment.has_class() && !old_comment.has_method();
        let declaration_touched = edits.iter().any(|e| {
            range_edited_old(e, old_comment) // class or method header hit
        });
        if !no_container && !declaration_touched {
            return None;
        }

        for candidate in new_comments {
            if candidate.text != old_comment.text {
                continue;
            }
            let container_renamed = candidate.containing_class != old_comment.containing_class
                || candidate.containing_method != old_comment.containing_method;
            if !container_renamed {
                continue;
            }
            let candidate_declaration_edited = edits.iter().any(|e| {
                (!candidate.class_declaration.is_none()
                    && e.occurs_in_new(
                        candidate.class_declaration.start_line,
                        candidate.class_declaration.end_line,
                    ))
                    || (!candidate.method_declaration.is_none()
                        && e.occurs_in_new(
                            candidate.method_declaration.start_line,
                            candidate.method_declaration.end_line,
                        ))
            });
            if candidate_declaration_edited {
                return Some(SatdInstance::new(
                    &delta.old_path,
                    CommentSnapshot::of(old_comment),
                    &delta.new_path,
                    CommentSnapshot::of(candidate),
                    Resolution::ClassOrMethodChanged,
                ));
            }
        }
        None
    }

    /// Sibling-file search for a comment that left its file
    ///
    /// Same-containing-method matches take priority. Verbatim
    /// duplicates in unrelated locations each produce a record; the
    /// ambiguity is surfaced through shared parentage downstream.
    fn find_moved(
        &self,
        delta: &FileDelta,
        old_comment: &GroupedComment,
    ) -> Result<Vec<SatdInstance>> {
        let mut same_method: Vec<(String, GroupedComment)> = Vec::new();
        let mut elsewhere: Vec<(String, GroupedComment)> = Vec::new();

        for sibling in self.differ.deltas() {
            if !sibling.has_new_side() || sibling.new_path == delta.new_path {
                continue;
            }
            for candidate in self.differ.comments_in_new(&sibling.new_path)? {
                if candidate.text != old_comment.text {
                    continue;
                }
                if candidate.containing_method == old_comment.containing_method {
                    same_method.push((sibling.new_path.clone(), candidate));
                } else {
                    elsewhere.push((sibling.new_path.clone(), candidate));
                }
            }
        }

        let chosen = if same_method.is_empty() {
            elsewhere
        } else {
            same_method
        };

        Ok(chosen
            .into_iter()
            .map(|(path, candidate)| {
                SatdInstance::new(
                    &delta.old_path,
                    CommentSnapshot::of(old_comment),
                    path,
                    CommentSnapshot::of(&candidate),
                    Resolution::SatdMovedFile,
                )
            })
            .collect())
    }

    /// New-side policy: newly introduced debt
    ///
    /// ADD emits a record per debt comment of the file. For the other
    /// kinds a debt comment counts as added only when it sits under an
    /// edit's new-side bounds and its text existed in no form in the
    /// old version of the file. "No form" is judged by the similarity
    /// heuristic, so a reworded survivor already recorded as
    /// SATD_CHANGED is not double-reported as SATD_ADDED.
    pub fn resolve_new_side(&self, delta: &FileDelta) -> Result<Vec<SatdInstance>> {
        if !delta.has_new_side() {
            return Ok(Vec::new());
        }

        let new_comments = self.differ.comments_in_new(&delta.new_path)?;
        let debt: Vec<&GroupedComment> = new_comments
            .iter()
            .filter(|c| self.predicate.is_debt(&c.text))
            .collect();

        let added: Vec<&GroupedComment> = match delta.kind {
            ChangeKind::Added => debt,
            _ => {
                let edits = self.differ.edits_for(delta)?;
                let old_comments = self.differ.comments_in_old(&delta.old_path)?;
                let threshold = self.config.similarity_threshold;
                debt.into_iter()
                    .filter(|c| {
                        edits
                            .iter()
                            .any(|e| e.occurs_in_new(c.start_line(), c.end_line()))
                            && !old_comments
                                .iter()
                                .any(|o| are_similar(&o.text, &c.text, threshold))
                    })
                    .collect()
            }
        };

        Ok(added
            .into_iter()
            .map(|comment| {
                SatdInstance::new(
                    &delta.old_path,
                    CommentSnapshot::absent(),
                    &delta.new_path,
                    CommentSnapshot::of(comment),
                    Resolution::SatdAdded,
                )
            })
            .collect())
    }
}

/// True when the edit hits the old comment's class or method header
fn range_edited_old(edit: &Edit, comment: &GroupedComment) -> bool {
    (!comment.class_declaration.is_none()
        && edit.occurs_in_old(
            comment.class_declaration.start_line,
            comment.class_declaration.end_line,
        ))
        || (!comment.method_declaration.is_none()
            && edit.occurs_in_old(
                comment.method_declaration.start_line,
                comment.method_declaration.end_line,
            ))
}
