//! Cursor-occlusion policy.
//!
//! Every handler that hides or replaces markup asks this policy first. When
//! the selection overlaps a span, the span stays raw so it can be edited; the
//! rest of the document renders as a live preview.
//!
//! Boundary rule: a non-empty selection range occludes a span when the two
//! half-open intervals overlap. A caret occludes a span when it lies anywhere
//! in `[from, to]`, both ends included, so a caret touching either delimiter
//! of `**bold**` reveals it. `CaretBoundary::Exclusive` switches carets to the
//! strict `(from, to)` test.

use std::ops::Range;

use crate::selection::{Selection, SelectionRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaretBoundary {
    /// Caret at `from` or `to` counts as inside.
    #[default]
    Inclusive,
    /// Only a caret strictly between `from` and `to` counts as inside.
    Exclusive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OcclusionPolicy {
    caret: CaretBoundary,
}

impl OcclusionPolicy {
    pub fn new(caret: CaretBoundary) -> Self {
        Self { caret }
    }

    pub fn caret_boundary(&self) -> CaretBoundary {
        self.caret
    }

    /// True when a decoration over `span` must be suppressed.
    pub fn should_reveal(&self, selection: &Selection, span: &Range<usize>) -> bool {
        selection
            .ranges()
            .iter()
            .any(|range| self.range_overlaps(range, span))
    }

    pub fn range_overlaps(&self, range: &SelectionRange, span: &Range<usize>) -> bool {
        if range.is_caret() {
            let pos = range.from;
            match self.caret {
                CaretBoundary::Inclusive => span.start <= pos && pos <= span.end,
                CaretBoundary::Exclusive => span.start < pos && pos < span.end,
            }
        } else {
            range.from < span.end && range.to > span.start
        }
    }
}
