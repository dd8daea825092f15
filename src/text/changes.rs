use std::ops::Range;

use crate::error::{OverlayError, OverlayResult};

/// One replacement of `from..to` (old document coordinates) with `insert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub from: usize,
    pub to: usize,
    pub insert: String,
}

impl Change {
    pub fn new(from: usize, to: usize, insert: impl Into<String>) -> Self {
        Self {
            from,
            to,
            insert: insert.into(),
        }
    }

    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::new(at, at, text)
    }

    fn delta(&self) -> isize {
        self.insert.len() as isize - (self.to - self.from) as isize
    }
}

/// Which side of an insertion a mapped position sticks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Before,
    After,
}

/// The edits taking one document version to the next.
///
/// Changes are sorted by `from` and never overlap; all coordinates refer to
/// the document the set is applied to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<Change>,
}

impl ChangeSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn single(change: Change) -> Self {
        Self {
            changes: vec![change],
        }
    }

    /// Build a change set, sorting the changes and rejecting overlaps.
    pub fn new(mut changes: Vec<Change>) -> OverlayResult<Self> {
        changes.sort_by_key(|c| (c.from, c.to));
        for change in &changes {
            if change.from > change.to {
                return Err(OverlayError::internal(format!(
                    "inverted change {}..{}",
                    change.from, change.to
                )));
            }
        }
        for pair in changes.windows(2) {
            if pair[1].from < pair[0].to {
                return Err(OverlayError::internal(format!(
                    "overlapping changes {}..{} and {}..{}",
                    pair[0].from, pair[0].to, pair[1].from, pair[1].to
                )));
            }
        }
        Ok(Self { changes })
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Apply the changes to `text`, validating bounds and char boundaries.
    pub fn apply(&self, text: &str) -> OverlayResult<String> {
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for change in &self.changes {
            if change.to > text.len()
                || !text.is_char_boundary(change.from)
                || !text.is_char_boundary(change.to)
            {
                return Err(OverlayError::internal(format!(
                    "change {}..{} out of bounds for document of length {}",
                    change.from,
                    change.to,
                    text.len()
                )));
            }
            out.push_str(&text[cursor..change.from]);
            out.push_str(&change.insert);
            cursor = change.to;
        }
        out.push_str(&text[cursor..]);
        Ok(out)
    }

    /// Map a position in the old document to the new one.
    pub fn map_pos(&self, pos: usize, assoc: Assoc) -> usize {
        let mut delta: isize = 0;
        for change in &self.changes {
            if pos < change.from {
                break;
            }
            if pos > change.to || (pos == change.to && change.from < change.to) {
                delta += change.delta();
                continue;
            }
            let base = change.from as isize + delta;
            return match assoc {
                Assoc::Before => base as usize,
                Assoc::After => base as usize + change.insert.len(),
            };
        }
        (pos as isize + delta) as usize
    }

    /// Whether any change edits text inside `range` or inserts strictly within it.
    pub fn touches(&self, range: &Range<usize>) -> bool {
        self.changes.iter().any(|c| {
            if c.from == c.to {
                range.start < c.from && c.from < range.end
            } else {
                c.from < range.end && c.to > range.start
            }
        })
    }

    /// Map an untouched range into the new document; `None` if an edit touched it.
    pub fn map_range(&self, range: &Range<usize>) -> Option<Range<usize>> {
        if self.touches(range) {
            return None;
        }
        let start = self.map_pos(range.start, Assoc::After);
        let end = self.map_pos(range.end, Assoc::Before).max(start);
        Some(start..end)
    }

    /// Inserted text with its range in new document coordinates.
    pub fn inserted(&self) -> impl Iterator<Item = (Range<usize>, &str)> {
        let mut delta: isize = 0;
        self.changes.iter().map(move |c| {
            let from = (c.from as isize + delta) as usize;
            delta += c.delta();
            (from..from + c.insert.len(), c.insert.as_str())
        })
    }
}
