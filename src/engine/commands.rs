//! Click handling and the two widget commands with a write side effect.

use super::{EditorState, OverlayEngine, Transaction, UserEvent};
use crate::decoration::Widget;
use crate::handlers::checkbox::marker_state;
use crate::handlers::diagram::parse_fence;
use crate::handlers::image::parse_image;
use crate::selection::Selection;
use crate::syntax::NodeKind;
use crate::text::{Change, ChangeSet};

impl OverlayEngine {
    /// Resolve a click on the rendered overlay into a follow-up transaction.
    ///
    /// Only clicks on a widget do anything: checkboxes toggle, images put the
    /// caret on their source, diagrams unfold.
    pub fn click(&self, state: &EditorState, pos: usize) -> Option<Transaction> {
        let decoration = state.decorations().occluding_at(pos).next()?;
        match decoration.widget()?.as_ref() {
            Widget::Checkbox { .. } => self.toggle_task(state, pos),
            Widget::Image { .. } => {
                let text = state.doc().slice(decoration.range())?;
                let image = parse_image(text)?;
                Some(
                    Transaction::new()
                        .with_selection(Selection::cursor(decoration.from + image.src_offset))
                        .with_user_event(UserEvent::Select),
                )
            }
            Widget::Diagram { .. } => self.toggle_diagram_fold(state, pos),
            _ => None,
        }
    }

    /// Flip the task marker at `pos` between `[ ]` and `[x]`.
    ///
    /// The result is a single three-byte rewrite of the marker.
    pub fn toggle_task(&self, state: &EditorState, pos: usize) -> Option<Transaction> {
        let marker = state
            .tree()
            .enclosing(&(pos..pos), |kind| *kind == NodeKind::TaskMarker)?;
        let checked = marker_state(state.doc().slice(marker.range())?)?;
        let insert = if checked { "[ ]" } else { "[x]" };
        Some(
            Transaction::new()
                .with_changes(ChangeSet::single(Change::new(
                    marker.from,
                    marker.to,
                    insert,
                )))
                .with_user_event(UserEvent::Synthetic)
                .based_on(state.doc().version()),
        )
    }

    /// Switch the diagram block at `pos` between rendered and raw form.
    ///
    /// Fold state follows the caret: unfolding moves the caret to the start
    /// of the block body, folding moves it just outside the block. A block
    /// that is the whole document has no outside position, so folding it
    /// returns `None` and it stays expanded while the caret is in it.
    pub fn toggle_diagram_fold(&self, state: &EditorState, pos: usize) -> Option<Transaction> {
        let block = state
            .tree()
            .enclosing(&(pos..pos), |kind| *kind == NodeKind::FencedCode)?;
        let raw = state.doc().slice(block.range())?;
        let text = raw.trim_end_matches(['\n', '\r']);
        let span = block.from..block.from + text.len();

        let folded = state.decorations().iter().any(|d| {
            d.from == span.start
                && matches!(d.widget().map(|w| w.as_ref()), Some(Widget::Diagram { .. }))
        });

        let caret = if folded {
            let fence = parse_fence(text)?;
            span.start + fence.content.start
        } else if span.end < state.doc().len() {
            span.end + 1
        } else if span.start > 0 {
            span.start - 1
        } else {
            return None;
        };
        Some(
            Transaction::new()
                .with_selection(Selection::cursor(caret))
                .with_user_event(UserEvent::Select),
        )
    }
}
