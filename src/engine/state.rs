use std::ops::Range;

use crate::decoration::DecorationSet;
use crate::emoji::UndoGuard;
use crate::selection::Selection;
use crate::syntax::SyntaxTree;
use crate::text::{Assoc, ChangeSet, Document};

/// Editor state as the engine sees it. Produced by `OverlayEngine`; every
/// transaction yields a new value.
#[derive(Debug, Clone)]
pub struct EditorState {
    pub(super) doc: Document,
    pub(super) tree: SyntaxTree,
    pub(super) selection: Selection,
    pub(super) viewport: Vec<Range<usize>>,
    pub(super) decorations: DecorationSet,
    pub(super) undo_guard: UndoGuard,
}

impl EditorState {
    pub fn doc(&self) -> &Document {
        &self.doc
    }

    pub fn tree(&self) -> &SyntaxTree {
        &self.tree
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewport(&self) -> &[Range<usize>] {
        &self.viewport
    }

    /// Decorations for the current document version.
    pub fn decorations(&self) -> &DecorationSet {
        &self.decorations
    }

    pub fn undo_guard(&self) -> UndoGuard {
        self.undo_guard
    }
}

/// Viewport ranges carried across an edit and clamped to the new length.
///
/// Ranges grow to include text inserted at their edges.
pub(super) fn map_viewport(
    viewport: &[Range<usize>],
    changes: &ChangeSet,
    len: usize,
) -> Vec<Range<usize>> {
    viewport
        .iter()
        .map(|range| {
            let start = changes.map_pos(range.start, Assoc::Before).min(len);
            let end = changes.map_pos(range.end, Assoc::After).clamp(start, len);
            start..end
        })
        .collect()
}

/// Clamp host-supplied ranges to the document.
pub(super) fn clamp_viewport(viewport: Vec<Range<usize>>, len: usize) -> Vec<Range<usize>> {
    viewport
        .into_iter()
        .map(|range| {
            let start = range.start.min(len);
            start..range.end.clamp(start, len)
        })
        .collect()
}
