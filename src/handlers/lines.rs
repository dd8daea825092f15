//! Line attributes for headings and fenced code blocks.

use super::{HandlerContext, HandlerOutput, NodeHandler};
use crate::decoration::Decoration;
use crate::syntax::{NodeKind, SyntaxNode};

pub struct LineAttributeHandler;

impl NodeHandler for LineAttributeHandler {
    fn name(&self) -> &'static str {
        "lines"
    }

    fn accepts(&self, kind: &NodeKind) -> bool {
        matches!(kind, NodeKind::Heading(_) | NodeKind::FencedCode)
    }

    fn decorate(&self, node: &SyntaxNode, ctx: &HandlerContext<'_>, out: &mut HandlerOutput) {
        match node.kind {
            NodeKind::Heading(level) => {
                let line = ctx.doc.line_at(node.from);
                out.push(Decoration::line(line.from, format!("cm-heading-{level}")));
            }
            NodeKind::FencedCode => {
                for line in ctx.doc.lines_in(ctx.block_span(node)) {
                    out.push(Decoration::line(line.from, "cm-codeblock"));
                }
            }
            _ => {}
        }
    }
}
