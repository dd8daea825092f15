//! Decorations: instructions to hide, replace, or style a span without
//! touching the text.
//!
//! Handlers emit candidate `Decoration`s; `DecorationSet::build` resolves
//! them into one ordered, non-overlapping overlay per rebuild, and the
//! `WidgetRegistry` swaps structurally equal widgets for the instances the
//! previous rebuild already handed to the host.

mod registry;
mod set;
mod widget;

pub use registry::{ReuseStats, WidgetRegistry};
pub use set::DecorationSet;
pub use widget::{DiagramView, Widget};

use std::ops::Range;
use std::sync::Arc;

use serde::Serialize;

/// Conflict priority, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    LineAttribute = 0,
    Mark = 1,
    Hide = 2,
    InlineReplace = 3,
    BlockReplace = 4,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DecorationKind {
    /// Span is not displayed.
    Hide,
    /// Span is displayed as `widget`.
    Replace { widget: Arc<Widget>, block: bool },
    /// Span keeps its text and gains a style class.
    Mark { class: String },
    /// The line starting at `from` gains a style class.
    Line { class: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Decoration {
    pub from: usize,
    pub to: usize,
    #[serde(flatten)]
    pub kind: DecorationKind,
}

impl Decoration {
    pub fn hide(range: Range<usize>) -> Self {
        Self {
            from: range.start,
            to: range.end,
            kind: DecorationKind::Hide,
        }
    }

    /// Replace `range` with `widget`; block widgets get block priority.
    pub fn replace(range: Range<usize>, widget: Widget) -> Self {
        let block = widget.is_block();
        Self {
            from: range.start,
            to: range.end,
            kind: DecorationKind::Replace {
                widget: Arc::new(widget),
                block,
            },
        }
    }

    pub fn mark(range: Range<usize>, class: impl Into<String>) -> Self {
        Self {
            from: range.start,
            to: range.end,
            kind: DecorationKind::Mark {
                class: class.into(),
            },
        }
    }

    pub fn line(line_start: usize, class: impl Into<String>) -> Self {
        Self {
            from: line_start,
            to: line_start,
            kind: DecorationKind::Line {
                class: class.into(),
            },
        }
    }

    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }

    pub fn priority(&self) -> Priority {
        match &self.kind {
            DecorationKind::Replace { block: true, .. } => Priority::BlockReplace,
            DecorationKind::Replace { block: false, .. } => Priority::InlineReplace,
            DecorationKind::Hide => Priority::Hide,
            DecorationKind::Mark { .. } => Priority::Mark,
            DecorationKind::Line { .. } => Priority::LineAttribute,
        }
    }

    pub fn widget(&self) -> Option<&Arc<Widget>> {
        match &self.kind {
            DecorationKind::Replace { widget, .. } => Some(widget),
            _ => None,
        }
    }

    /// Hides and replacements are what occlusion suppresses.
    pub fn is_occluding(&self) -> bool {
        matches!(
            self.kind,
            DecorationKind::Hide | DecorationKind::Replace { .. }
        )
    }
}
