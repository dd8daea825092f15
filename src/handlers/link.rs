//! `[label](target)` links collapse to their label.

use super::{HandlerContext, HandlerOutput, NodeHandler};
use crate::decoration::Decoration;
use crate::syntax::{NodeKind, SyntaxNode};

pub struct LinkHandler;

/// Offset of the `]` closing the label that opens `text`, when it is
/// immediately followed by `(`.
///
/// `text` must start with `[`. Nested brackets and backslash escapes inside
/// the label are skipped.
pub(crate) fn label_end(text: &str) -> Option<usize> {
    if !text.starts_with('[') {
        return None;
    }
    let mut depth = 0usize;
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '[' => depth += 1,
            ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return text[i + 1..].starts_with('(').then_some(i);
                }
            }
            _ => {}
        }
    }
    None
}

impl NodeHandler for LinkHandler {
    fn name(&self) -> &'static str {
        "link"
    }

    fn accepts(&self, kind: &NodeKind) -> bool {
        *kind == NodeKind::Link
    }

    fn decorate(&self, node: &SyntaxNode, ctx: &HandlerContext<'_>, out: &mut HandlerOutput) {
        let text = ctx.text(&node.range());
        let Some(close) = label_end(text) else {
            return;
        };
        if !text.ends_with(')') || ctx.reveals(&node.range()) {
            return;
        }
        // the builder splits the mark around the hidden delimiters
        out.push(Decoration::mark(node.range(), "cm-link"));
        out.push(Decoration::hide(node.from..node.from + 1));
        out.push(Decoration::hide(node.from + close..node.to));
    }
}
