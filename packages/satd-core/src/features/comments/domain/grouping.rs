//! Comment grouping
//!
//! Merges runs of contiguous raw comments into single logical units.
//! Two consecutive comments merge iff they share a containing class,
//! are of the same kind (or the earlier one is commented-out source),
//! and are on directly adjacent lines. Merging is transitive.

use super::grouped_comment::{CommentKind, GroupedComment};
use crate::shared::models::LineRange;

/// Collapse contiguous comment runs into grouped units
///
/// Input order does not matter; output is ordered by start line,
/// ascending. Grouping an already-grouped sequence is a no-op.
pub fn group_comments(mut comments: Vec<GroupedComment>) -> Vec<GroupedComment> {
    comments.sort_by_key(|c| c.range.start_line);

    let mut grouped: Vec<GroupedComment> = Vec::with_capacity(comments.len());
    for comment in comments {
        let mergeable = grouped
            .last()
            .is_some_and(|prev| can_merge(prev, &comment));
        if mergeable {
            if let Some(prev) = grouped.pop() {
                grouped.push(merge(prev, comment));
            }
        } else {
            grouped.push(comment);
        }
    }
    grouped
}

fn can_merge(first: &GroupedComment, second: &GroupedComment) -> bool {
    first.containing_class == second.containing_class
        && (first.kind == second.kind || first.kind == CommentKind::CommentedOutSource)
        && first.range.end_line + 1 == second.range.start_line
}

/// Merge two adjacent comments into one unit
///
/// The merged text is the ordered concatenation. A leading
/// commented-out-source member hands the syntactic kind to its
/// successor; the constructor re-applies the code-like override on the
/// joined text, so units that absorbed disabled code stay excluded.
fn merge(first: GroupedComment, second: GroupedComment) -> GroupedComment {
    let kind = if first.kind == CommentKind::CommentedOutSource {
        second.kind
    } else {
        first.kind
    };
    GroupedComment::new(
        LineRange::new(first.range.start_line, second.range.end_line),
        format!("{}\n{}", first.text, second.text),
        kind,
        first.containing_class,
        first.class_declaration,
        first.containing_method,
        first.method_declaration,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(start: u32, end: u32, text: &str, class: &str) -> GroupedComment {
        GroupedComment::new(
            LineRange::new(start, end),
            text,
            CommentKind::Line,
            class,
            LineRange::new(1, 1),
            "m()",
            LineRange::new(2, 2),
        )
    }

    #[test]
    fn test_adjacent_same_class_merge() {
        let grouped = group_comments(vec![
            comment(10, 10, "TODO rework", "Foo"),
            comment(11, 11, "the cache layer", "Foo"),
        ]);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].range, LineRange::new(10, 11));
        assert_eq!(grouped[0].text, "TODO rework\nthe cache layer");
    }

    #[test]
    fn test_run_of_three_collapses_to_one() {
        let grouped = group_comments(vec![
            comment(5, 5, "a", "Foo"),
            comment(6, 6, "b", "Foo"),
            comment(7, 7, "c", "Foo"),
        ]);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].range, LineRange::new(5, 7));
        assert_eq!(grouped[0].text, "a\nb\nc");
    }

    #[test]
    fn test_gap_prevents_merge() {
        let grouped = group_comments(vec![
            comment(10, 10, "first", "Foo"),
            comment(12, 12, "second", "Foo"),
        ]);
        assert_eq!(grouped.len(), 2);
    }

    #[test]
    fn test_different_class_prevents_merge() {
        let grouped = group_comments(vec![
            comment(10, 10, "first", "Foo"),
            comment(11, 11, "second", "Bar"),
        ]);
        assert_eq!(grouped.len(), 2);
    }

    #[test]
    fn test_different_kind_prevents_merge() {
        let line = comment(10, 10, "line", "Foo");
        let block = GroupedComment::new(
            LineRange::new(11, 11),
            "block",
            CommentKind::Block,
            "Foo",
            LineRange::new(1, 1),
            "m()",
            LineRange::new(2, 2),
        );
        let grouped = group_comments(vec![line, block]);
        assert_eq!(grouped.len(), 2);
    }

    #[test]
    fn test_commented_out_source_absorbs_successor() {
        let disabled = comment(10, 10, "int x = 1;", "Foo");
        assert_eq!(disabled.kind, CommentKind::CommentedOutSource);

        let grouped = group_comments(vec![disabled, comment(11, 11, "TODO re-enable", "Foo")]);
        assert_eq!(grouped.len(), 1);
        // Joined text still carries the ';', so the unit stays excluded
        assert_eq!(grouped[0].kind, CommentKind::CommentedOutSource);
    }

    #[test]
    fn test_grouping_is_idempotent() {
        let once = group_comments(vec![
            comment(5, 5, "a", "Foo"),
            comment(6, 6, "b", "Foo"),
            comment(9, 9, "c", "Foo"),
        ]);
        let twice = group_comments(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unsorted_input_is_ordered_and_grouped() {
        let grouped = group_comments(vec![
            comment(6, 6, "b", "Foo"),
            comment(20, 20, "later", "Foo"),
            comment(5, 5, "a", "Foo"),
        ]);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].text, "a\nb");
        assert_eq!(grouped[1].range.start_line, 20);
    }
}
