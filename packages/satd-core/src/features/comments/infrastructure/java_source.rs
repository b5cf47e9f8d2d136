//! Java comment extraction
//!
//! Tree-sitter backed implementation of the comment source port.
//! Walks the syntax tree once, collecting comment nodes together with
//! class/method declarations, then resolves each comment's containers
//! by innermost line containment.

use tree_sitter::{Node as TSNode, Parser as TSParser};

use crate::config::TrackerConfig;
use crate::errors::{Result, SatdError};
use crate::features::comments::domain::{
    group_comments, CommentKind, GroupedComment, NO_CONTAINER,
};
use crate::features::comments::ports::CommentSource;
use crate::shared::models::LineRange;

/// Tree-sitter based Java comment source
pub struct JavaCommentSource {
    /// Lowercased words that disqualify a comment from mining
    ignorable_words: Vec<String>,
}

/// Class or method declaration collected during the tree walk
struct Declaration {
    name: String,
    /// Full extent including the body
    span: LineRange,
    /// Declaration header lines (up to the body opening)
    header: LineRange,
}

/// Unit comment before grouping and container resolution
struct RawComment {
    range: LineRange,
    text: String,
    kind: CommentKind,
}

impl JavaCommentSource {
    pub fn new(config: &TrackerConfig) -> Self {
        Self {
            ignorable_words: config
                .ignorable_words
                .iter()
                .map(|w| w.to_lowercase())
                .collect(),
        }
    }

    /// Resolve containers, group runs, and drop non-minable units
    fn assemble(
        &self,
        raw: Vec<RawComment>,
        classes: &[Declaration],
        methods: &[Declaration],
    ) -> Vec<GroupedComment> {
        let comments = raw
            .into_iter()
            .map(|rc| {
                let class = innermost(classes, rc.range.start_line);
                let method = innermost(methods, rc.range.start_line);
                let kind = match (class, rc.kind) {
                    // Comments outside every type declaration are orphans
                    (None, CommentKind::Line) | (None, CommentKind::Block) => CommentKind::Orphan,
                    (_, kind) => kind,
                };
                GroupedComment::new(
                    rc.range,
                    rc.text,
                    kind,
                    class.map_or(NO_CONTAINER.to_string(), |d| d.name.clone()),
                    class.map_or(LineRange::NONE, |d| d.header),
                    method.map_or(NO_CONTAINER.to_string(), |d| d.name.clone()),
                    method.map_or(LineRange::NONE, |d| d.header),
                )
            })
            .collect();

        group_comments(comments)
            .into_iter()
            .filter(|c| self.is_minable(c))
            .collect()
    }

    /// Post-grouping filter: documentation, disabled code, blank units
    /// and ignore-worded comments never reach the resolver
    fn is_minable(&self, comment: &GroupedComment) -> bool {
        if matches!(
            comment.kind,
            CommentKind::JavaDoc | CommentKind::CommentedOutSource
        ) {
            return false;
        }
        if comment.text.trim().is_empty() {
            return false;
        }
        let lower = comment.text.to_lowercase();
        !self.ignorable_words.iter().any(|word| lower.contains(word))
    }
}

impl CommentSource for JavaCommentSource {
    fn extract(&self, source: &str, file_path: &str) -> Result<Vec<GroupedComment>> {
        let mut parser = TSParser::new();
        parser
            .set_language(&tree_sitter_java::language())
            .map_err(|e| SatdError::parse(file_path, format!("failed to load Java grammar: {e}")))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| SatdError::parse(file_path, "tree-sitter produced no tree"))?;

        if tree.root_node().has_error() {
            return Err(SatdError::parse(file_path, "source contains syntax errors"));
        }

        let mut raw = Vec::new();
        let mut classes = Vec::new();
        let mut methods = Vec::new();
        collect(&tree.root_node(), source, &mut raw, &mut classes, &mut methods);

        Ok(self.assemble(raw, &classes, &methods))
    }

    fn supports_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case("java")
    }

    fn language_name(&self) -> &'static str {
        "Java"
    }
}

/// Pre-order walk collecting comments and declarations in one pass
fn collect(
    node: &TSNode,
    source: &str,
    raw: &mut Vec<RawComment>,
    classes: &mut Vec<Declaration>,
    methods: &mut Vec<Declaration>,
) {
    match node.kind() {
        "line_comment" | "block_comment" => {
            raw.push(classify_comment(node, source));
            return;
        }
        "class_declaration"
        | "interface_declaration"
        | "enum_declaration"
        | "record_declaration" => {
            if let Some(decl) = named_declaration(node, source) {
                classes.push(decl);
            }
        }
        "method_declaration" | "constructor_declaration" => {
            if let Some(decl) = method_declaration(node, source) {
                methods.push(decl);
            }
        }
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        collect(&child, source, raw, classes, methods);
    }
}

fn classify_comment(node: &TSNode, source: &str) -> RawComment {
    let range = full_span(node);
    let text = source.get(node.byte_range()).unwrap_or("");

    if node.kind() == "line_comment" {
        return RawComment {
            range,
            text: text.trim_start_matches("//").trim().to_string(),
            kind: CommentKind::Line,
        };
    }

    if text.starts_with("/**") {
        RawComment {
            range,
            text: strip_block_text(text, "/**"),
            kind: CommentKind::JavaDoc,
        }
    } else {
        RawComment {
            range,
            text: strip_block_text(text, "/*"),
            kind: CommentKind::Block,
        }
    }
}

/// Strip delimiters and per-line decoration from a block comment
fn strip_block_text(raw: &str, open: &str) -> String {
    raw.trim_start_matches(open)
        .trim_end_matches("*/")
        .lines()
        .map(|l| l.trim().trim_start_matches('*').trim())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

fn named_declaration(node: &TSNode, source: &str) -> Option<Declaration> {
    let name_node = node.child_by_field_name("name")?;
    let name = source.get(name_node.byte_range())?.to_string();
    Some(Declaration {
        name,
        span: full_span(node),
        header: header_span(node),
    })
}

/// Method signature as `name(Type1,Type2)`
fn method_declaration(node: &TSNode, source: &str) -> Option<Declaration> {
    let name_node = node.child_by_field_name("name")?;
    let name = source.get(name_node.byte_range())?;

    let mut types = Vec::new();
    if let Some(params) = node.child_by_field_name("parameters") {
        let mut cursor = params.walk();
        for child in params.children(&mut cursor) {
            if child.kind() == "formal_parameter" || child.kind() == "spread_parameter" {
                if let Some(ty) = child.child_by_field_name("type") {
                    if let Some(text) = source.get(ty.byte_range()) {
                        types.push(text.to_string());
                    }
                }
            }
        }
    }

    Some(Declaration {
        name: format!("{}({})", name, types.join(",")),
        span: full_span(node),
        header: header_span(node),
    })
}

fn full_span(node: &TSNode) -> LineRange {
    LineRange::new(
        node.start_position().row as u32 + 1,
        node.end_position().row as u32 + 1,
    )
}

fn header_span(node: &TSNode) -> LineRange {
    let start = node.start_position().row as u32 + 1;
    match node.child_by_field_name("body") {
        Some(body) => LineRange::new(start, body.start_position().row as u32 + 1),
        None => full_span(node),
    }
}

/// Innermost declaration whose full span contains the line
fn innermost(decls: &[Declaration], line: u32) -> Option<&Declaration> {
    decls
        .iter()
        .filter(|d| d.span.contains_line(line))
        .min_by_key(|d| d.span.line_count())
}
