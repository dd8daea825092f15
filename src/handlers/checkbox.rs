//! Task list markers as interactive checkboxes.

use super::{HandlerContext, HandlerOutput, NodeHandler};
use crate::decoration::{Decoration, Widget};
use crate::syntax::{NodeKind, SyntaxNode};

pub struct CheckboxHandler;

/// Checked state of a task marker's text: `[ ]` is open, `[x]`/`[X]` done.
pub fn marker_state(text: &str) -> Option<bool> {
    match text {
        "[ ]" => Some(false),
        "[x]" | "[X]" => Some(true),
        _ => None,
    }
}

impl NodeHandler for CheckboxHandler {
    fn name(&self) -> &'static str {
        "checkbox"
    }

    fn accepts(&self, kind: &NodeKind) -> bool {
        *kind == NodeKind::TaskMarker
    }

    fn decorate(&self, node: &SyntaxNode, ctx: &HandlerContext<'_>, out: &mut HandlerOutput) {
        let Some(checked) = marker_state(ctx.text(&node.range())) else {
            return;
        };
        if ctx.reveals(&node.range()) {
            return;
        }
        out.push(Decoration::replace(node.range(), Widget::Checkbox { checked }));
    }
}
