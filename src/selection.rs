//! Selection state consulted for occlusion decisions.

use std::ops::Range;

use crate::text::{Assoc, ChangeSet};

/// One selected range, normalised so `from <= to`. Empty means a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub struct SelectionRange {
    pub from: usize,
    pub to: usize,
}

impl SelectionRange {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            from: a.min(b),
            to: a.max(b),
        }
    }

    pub fn cursor(pos: usize) -> Self {
        Self { from: pos, to: pos }
    }

    pub fn is_caret(&self) -> bool {
        self.from == self.to
    }

    pub fn range(&self) -> Range<usize> {
        self.from..self.to
    }
}

/// Zero or more ranges forming the active selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct Selection {
    ranges: Vec<SelectionRange>,
}

impl Selection {
    pub fn new(ranges: Vec<SelectionRange>) -> Self {
        Self { ranges }
    }

    /// No selection at all: nothing is occluded.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn cursor(pos: usize) -> Self {
        Self::new(vec![SelectionRange::cursor(pos)])
    }

    pub fn single(from: usize, to: usize) -> Self {
        Self::new(vec![SelectionRange::new(from, to)])
    }

    pub fn ranges(&self) -> &[SelectionRange] {
        &self.ranges
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// The primary caret position, if any.
    pub fn main_head(&self) -> Option<usize> {
        self.ranges.first().map(|r| r.to)
    }

    /// Carry the selection across an edit.
    pub fn map(&self, changes: &ChangeSet) -> Selection {
        let ranges = self
            .ranges
            .iter()
            .map(|r| {
                if r.is_caret() {
                    SelectionRange::cursor(changes.map_pos(r.from, Assoc::After))
                } else {
                    SelectionRange::new(
                        changes.map_pos(r.from, Assoc::After),
                        changes.map_pos(r.to, Assoc::Before),
                    )
                }
            })
            .collect();
        Selection { ranges }
    }
}
