use std::ops::Range;
use std::sync::Arc;

use super::ChangeSet;
use crate::error::OverlayResult;

/// Compute the byte offset of every line start. Always contains at least `0`.
pub fn compute_line_starts(text: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(text.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}

/// A line of the document, without its trailing newline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 0-indexed line number
    pub number: usize,
    pub from: usize,
    pub to: usize,
    pub text: &'a str,
}

/// Versioned immutable text buffer.
///
/// Cloning is cheap: text and line index are shared. Every applied change set
/// yields a new document with the next version number.
#[derive(Debug, Clone)]
pub struct Document {
    text: Arc<str>,
    version: u64,
    line_starts: Arc<[usize]>,
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version && self.text == other.text
    }
}

impl Document {
    /// Create a new document at version 0
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_version(text, 0)
    }

    /// Create a new document with version
    pub fn with_version(text: impl Into<String>, version: u64) -> Self {
        let text: String = text.into();
        let line_starts = compute_line_starts(&text);
        Self {
            text: Arc::from(text),
            version,
            line_starts: Arc::from(line_starts),
        }
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the document version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the document is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Text of `range`, or `None` when out of bounds or not on char boundaries.
    pub fn slice(&self, range: Range<usize>) -> Option<&str> {
        self.text.get(range)
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Line by 0-indexed number.
    pub fn line(&self, number: usize) -> Option<Line<'_>> {
        let from = *self.line_starts.get(number)?;
        let to = match self.line_starts.get(number + 1) {
            Some(next) => next - 1,
            None => self.text.len(),
        };
        Some(Line {
            number,
            from,
            to,
            text: &self.text[from..to],
        })
    }

    /// Line containing byte offset `pos` (clamped to the document).
    pub fn line_at(&self, pos: usize) -> Line<'_> {
        let pos = pos.min(self.text.len());
        let number = match self.line_starts.binary_search(&pos) {
            Ok(line) => line,
            Err(line) => line.saturating_sub(1),
        };
        // line_starts is never empty and number is a valid index
        self.line(number).unwrap_or(Line {
            number: 0,
            from: 0,
            to: 0,
            text: "",
        })
    }

    /// Lines intersecting `range`, in order.
    pub fn lines_in(&self, range: Range<usize>) -> impl Iterator<Item = Line<'_>> {
        let first = self.line_at(range.start).number;
        let last = self.line_at(range.end).number;
        (first..=last).filter_map(move |n| self.line(n))
    }

    /// All lines of the document.
    pub fn lines(&self) -> impl Iterator<Item = Line<'_>> {
        (0..self.line_count()).filter_map(move |n| self.line(n))
    }

    /// Apply a change set, producing the next version.
    pub fn apply(&self, changes: &ChangeSet) -> OverlayResult<Document> {
        if changes.is_empty() {
            return Ok(Self {
                text: self.text.clone(),
                version: self.version + 1,
                line_starts: self.line_starts.clone(),
            });
        }
        let text = changes.apply(&self.text)?;
        Ok(Self::with_version(text, self.version + 1))
    }
}
