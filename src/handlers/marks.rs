//! Markup delimiters: heading `#`s, emphasis and strikethrough delimiters,
//! inline code backticks, list markers.

use super::{HandlerContext, HandlerOutput, NodeHandler};
use crate::decoration::{Decoration, Widget};
use crate::syntax::{NodeKind, SyntaxNode};

const BULLET: char = '•';

pub struct MarkHandler;

impl NodeHandler for MarkHandler {
    fn name(&self) -> &'static str {
        "marks"
    }

    fn accepts(&self, kind: &NodeKind) -> bool {
        kind.is_mark()
    }

    fn decorate(&self, node: &SyntaxNode, ctx: &HandlerContext<'_>, out: &mut HandlerOutput) {
        if node.kind == NodeKind::ListMark {
            bullet(node, ctx, out);
            return;
        }

        // Editing anywhere in `**bold**` shows both delimiters
        let scope = ctx
            .tree
            .enclosing(&node.range(), NodeKind::is_formatting_container)
            .map(|container| ctx.block_span(container))
            .unwrap_or_else(|| node.range());
        if ctx.reveals(&scope) {
            return;
        }

        let mut hidden = node.range();
        if node.kind == NodeKind::HeaderMark && ctx.text(&(node.to..node.to + 1)) == " " {
            hidden.end += 1;
        }
        out.push(Decoration::hide(hidden));
    }
}

/// Unordered list markers render as a bullet glyph; ordered ones stay text.
fn bullet(node: &SyntaxNode, ctx: &HandlerContext<'_>, out: &mut HandlerOutput) {
    if !matches!(ctx.text(&node.range()), "-" | "*" | "+") {
        return;
    }
    if ctx.reveals(&node.range()) {
        return;
    }
    out.push(Decoration::replace(node.range(), Widget::Bullet { glyph: BULLET }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoration::DecorationKind;
    use crate::handlers::test_support::Fixture;

    fn heading() -> Fixture {
        // "## Title\n"
        Fixture::new(
            "## Title\nbody",
            vec![
                SyntaxNode::new(NodeKind::Heading(2), 0, 9),
                SyntaxNode::new(NodeKind::HeaderMark, 0, 2),
            ],
        )
    }

    #[test]
    fn heading_mark_hides_with_trailing_space() {
        let out = heading().decorate(&MarkHandler, &NodeKind::HeaderMark);
        assert_eq!(out.decorations, vec![Decoration::hide(0..3)]);
    }

    #[test]
    fn caret_in_heading_reveals_mark() {
        let out = heading()
            .with_caret(6)
            .decorate(&MarkHandler, &NodeKind::HeaderMark);
        assert!(out.decorations.is_empty());
    }

    #[test]
    fn caret_on_next_line_keeps_heading_rendered() {
        let out = heading()
            .with_caret(9)
            .decorate(&MarkHandler, &NodeKind::HeaderMark);
        assert_eq!(out.decorations.len(), 1);
    }

    #[test]
    fn emphasis_delimiters_follow_their_container() {
        // "a **b** c"
        let fixture = Fixture::new(
            "a **b** c",
            vec![
                SyntaxNode::new(NodeKind::StrongEmphasis, 2, 7),
                SyntaxNode::new(NodeKind::EmphasisMark, 2, 4),
                SyntaxNode::new(NodeKind::EmphasisMark, 5, 7),
            ],
        );
        let ctx = fixture.ctx();
        let mut out = HandlerOutput::default();
        for node in fixture.tree.nodes().iter().filter(|n| n.kind.is_mark()) {
            MarkHandler.decorate(node, &ctx, &mut out);
        }
        assert_eq!(
            out.decorations,
            vec![Decoration::hide(2..4), Decoration::hide(5..7)]
        );

        // caret right after the closing delimiter still counts as inside
        let fixture = fixture.with_caret(7);
        let ctx = fixture.ctx();
        let mut out = HandlerOutput::default();
        for node in fixture.tree.nodes().iter().filter(|n| n.kind.is_mark()) {
            MarkHandler.decorate(node, &ctx, &mut out);
        }
        assert!(out.decorations.is_empty());
    }

    #[test]
    fn unordered_marker_becomes_bullet() {
        let fixture = Fixture::new(
            "- item",
            vec![SyntaxNode::new(NodeKind::ListMark, 0, 1)],
        );
        let out = fixture.decorate(&MarkHandler, &NodeKind::ListMark);
        assert!(matches!(
            &out.decorations[0].kind,
            DecorationKind::Replace { widget, block: false } if **widget == Widget::Bullet { glyph: '•' }
        ));
    }

    #[test]
    fn ordered_marker_stays_text() {
        let fixture = Fixture::new(
            "1. item",
            vec![SyntaxNode::new(NodeKind::ListMark, 0, 2)],
        );
        assert!(
            fixture
                .decorate(&MarkHandler, &NodeKind::ListMark)
                .decorations
                .is_empty()
        );
    }
}
