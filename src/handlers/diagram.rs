//! Fenced code blocks in a diagram language.
//!
//! A block is shown rendered (folded) unless the selection is inside it.
//! Whether folded or not, an uncached block requests a fetch so the image is
//! ready when the caret leaves.

use std::ops::Range;

use super::{HandlerContext, HandlerOutput, NodeHandler};
use crate::decoration::{Decoration, DiagramView, Widget};
use crate::diagram::{ContentKey, DiagramRequest};
use crate::syntax::{NodeKind, SyntaxNode};

pub struct DiagramHandler;

/// A fenced block split into its info word and body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fence<'t> {
    pub language: &'t str,
    /// Body range relative to the block text, fences excluded.
    pub content: Range<usize>,
}

/// Split a fenced block (without its trailing newline) into language and body.
pub fn parse_fence(text: &str) -> Option<Fence<'_>> {
    let first_end = text.find('\n').unwrap_or(text.len());
    let opening = text[..first_end].trim_start();
    let fence_char = opening.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let fence_len = opening.chars().take_while(|c| *c == fence_char).count();
    if fence_len < 3 {
        return None;
    }
    let language = opening[fence_len..].split_whitespace().next()?;

    let content_start = (first_end + 1).min(text.len());
    let last_start = text.rfind('\n').map_or(0, |i| i + 1);
    let closed = last_start > 0 && {
        let last = text[last_start..].trim();
        last.len() >= fence_len && last.chars().all(|c| c == fence_char)
    };
    let content_end = if closed {
        last_start.saturating_sub(1).max(content_start)
    } else {
        text.len()
    };

    Some(Fence {
        language,
        content: content_start..content_end,
    })
}

impl NodeHandler for DiagramHandler {
    fn name(&self) -> &'static str {
        "diagram"
    }

    fn accepts(&self, kind: &NodeKind) -> bool {
        *kind == NodeKind::FencedCode
    }

    fn decorate(&self, node: &SyntaxNode, ctx: &HandlerContext<'_>, out: &mut HandlerOutput) {
        let span = ctx.block_span(node);
        let text = ctx.text(&span);
        let Some(fence) = parse_fence(text) else {
            return;
        };
        if !ctx.settings.diagram.supports(fence.language) {
            return;
        }
        let language = fence.language.to_ascii_lowercase();
        let source = &text[fence.content];
        let key = ContentKey::new(&language, source);

        let cached = ctx.caches.diagrams.get(&key);
        if cached.is_none() {
            out.request(DiagramRequest {
                key,
                language: language.clone(),
                source: source.to_string(),
                from: span.start,
                to: span.end,
                version: ctx.doc.version(),
            });
        }

        if ctx.reveals(&span) {
            return;
        }
        let view = cached.map_or(DiagramView::Loading, |entry| entry.view());
        out.push(Decoration::replace(
            span,
            Widget::Diagram {
                key,
                language,
                view,
            },
        ));
    }
}
