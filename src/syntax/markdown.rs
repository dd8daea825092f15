//! Tree-sitter markdown adapter.
//!
//! tree-sitter-md splits markdown into a block grammar and an inline grammar.
//! The block tree is parsed first; every `inline` node and pipe table cell
//! is then re-parsed with the inline grammar restricted to that node's
//! range, so inline nodes come back in document coordinates.

use tree_sitter::{Node, Parser, Tree};

use super::{NodeKind, SyntaxNode, SyntaxTree};
use crate::error::{OverlayError, OverlayResult};

/// Map a tree-sitter-md node kind to the engine's node kind.
///
/// `text` is the node's source, used where tree-sitter encodes information
/// in the text rather than the kind (heading level).
pub fn kind_for(ts_kind: &str, text: &str) -> Option<NodeKind> {
    let kind = match ts_kind {
        "atx_heading" | "setext_heading" => {
            let level = text.bytes().take_while(|b| *b == b'#').count();
            let level = if level == 0 {
                // setext: `===` underline is level 1, `---` level 2
                if text.trim_end().ends_with('=') { 1 } else { 2 }
            } else {
                level.min(6)
            };
            NodeKind::Heading(level as u8)
        }
        "atx_h1_marker" | "atx_h2_marker" | "atx_h3_marker" | "atx_h4_marker"
        | "atx_h5_marker" | "atx_h6_marker" => NodeKind::HeaderMark,
        "emphasis" => NodeKind::Emphasis,
        "strong_emphasis" => NodeKind::StrongEmphasis,
        "emphasis_delimiter" => NodeKind::EmphasisMark,
        "strikethrough" => NodeKind::Strikethrough,
        "code_span" => NodeKind::InlineCode,
        "code_span_delimiter" => NodeKind::CodeMark,
        "fenced_code_block" => NodeKind::FencedCode,
        "info_string" => NodeKind::CodeInfo,
        "code_fence_content" => NodeKind::CodeText,
        "list_item" => NodeKind::ListItem,
        "list_marker_minus" | "list_marker_star" | "list_marker_plus" | "list_marker_dot"
        | "list_marker_parenthesis" => NodeKind::ListMark,
        "task_list_marker_checked" | "task_list_marker_unchecked" => NodeKind::TaskMarker,
        "image" => NodeKind::Image,
        "inline_link" => NodeKind::Link,
        "link_destination" | "uri_autolink" => NodeKind::Url,
        "pipe_table" => NodeKind::Table,
        "html_tag" => NodeKind::HtmlTag,
        "block_quote" => NodeKind::Blockquote,
        "block_quote_marker" => NodeKind::QuoteMark,
        "thematic_break" => NodeKind::HorizontalRule,
        _ => return None,
    };
    Some(kind)
}

/// Two-pass markdown parser producing a `SyntaxTree`.
pub struct MarkdownParser {
    block: Parser,
    inline: Parser,
}

impl MarkdownParser {
    pub fn new() -> OverlayResult<Self> {
        let mut block = Parser::new();
        block
            .set_language(&tree_sitter_md::LANGUAGE.into())
            .map_err(|e| OverlayError::internal(format!("markdown block grammar: {e}")))?;
        let mut inline = Parser::new();
        inline
            .set_language(&tree_sitter_md::INLINE_LANGUAGE.into())
            .map_err(|e| OverlayError::internal(format!("markdown inline grammar: {e}")))?;
        Ok(Self { block, inline })
    }

    /// Parse `text`. A failed parse yields an empty tree.
    pub fn parse(&mut self, text: &str) -> SyntaxTree {
        let Some(block_tree) = self.block.parse(text, None) else {
            log::warn!(target: "livemark::syntax", "Block parse returned no tree");
            return SyntaxTree::empty();
        };

        let mut nodes = Vec::new();
        let mut inline_ranges = Vec::new();
        collect(&block_tree, text, &mut nodes, &mut inline_ranges);

        for range in inline_ranges {
            if self.inline.set_included_ranges(&[range]).is_err() {
                continue;
            }
            if let Some(inline_tree) = self.inline.parse(text, None) {
                let mut nested = Vec::new();
                collect(&inline_tree, text, &mut nodes, &mut nested);
            }
        }
        // Leave the inline parser unrestricted for the next call
        let _ = self.inline.set_included_ranges(&[]);

        SyntaxTree::from_nodes(nodes)
    }
}

fn collect(
    tree: &Tree,
    text: &str,
    nodes: &mut Vec<SyntaxNode>,
    inline_ranges: &mut Vec<tree_sitter::Range>,
) {
    let mut cursor = tree.walk();
    loop {
        visit(cursor.node(), text, nodes, inline_ranges);
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return;
            }
        }
    }
}

fn visit(
    node: Node<'_>,
    text: &str,
    nodes: &mut Vec<SyntaxNode>,
    inline_ranges: &mut Vec<tree_sitter::Range>,
) {
    if matches!(node.kind(), "inline" | "pipe_table_cell") {
        inline_ranges.push(node.range());
        return;
    }
    let Some(source) = text.get(node.byte_range()) else {
        return;
    };
    let Some(kind) = kind_for(node.kind(), source) else {
        return;
    };
    let from = node.start_byte();
    // Block grammar list and quote markers include their trailing padding
    let to = if matches!(kind, NodeKind::ListMark | NodeKind::QuoteMark) {
        from + source.trim_end().len()
    } else {
        node.end_byte()
    };
    nodes.push(SyntaxNode::new(kind, from, to));
}
