use std::collections::HashSet;
use std::ops::Range;

use serde::Serialize;

use super::{Decoration, DecorationKind, Priority, ReuseStats, WidgetRegistry};

const LOG_TARGET: &str = "livemark::decoration";

/// Sorted, non-overlapping spans accepted so far.
#[derive(Debug, Default)]
struct Occupancy {
    spans: Vec<(Range<usize>, Priority)>,
}

impl Occupancy {
    fn overlapping(&self, range: &Range<usize>) -> impl Iterator<Item = &(Range<usize>, Priority)> {
        let first = self.spans.partition_point(|(r, _)| r.end <= range.start);
        let range = range.clone();
        self.spans[first..]
            .iter()
            .take_while(move |(r, _)| r.start < range.end)
            .filter(move |(r, _)| overlaps(r, &range))
    }

    fn insert(&mut self, range: Range<usize>, priority: Priority) {
        let at = self.spans.partition_point(|(r, _)| r.start < range.start);
        self.spans.insert(at, (range, priority));
    }
}

/// Half-open overlap; a zero-width span overlaps only spans strictly around it.
fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    if a.is_empty() || b.is_empty() {
        let (point, span) = if a.is_empty() { (a.start, b) } else { (b.start, a) };
        return span.start < point && point < span.end;
    }
    a.start < b.end && b.start < a.end
}

fn contains(outer: &Range<usize>, inner: &Range<usize>) -> bool {
    outer.start <= inner.start && inner.end <= outer.end
}

/// The conflict-free overlay produced by one rebuild.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DecorationSet {
    decorations: Vec<Decoration>,
}

impl DecorationSet {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Resolve handler candidates into one ordered, non-overlapping set.
    ///
    /// Higher priority wins an overlap. Marks are split around higher
    /// priority spans instead of being dropped. Of two same-priority spans,
    /// an enclosing one wins over the one it contains; crossing spans of
    /// equal priority mean a handler computed a bad range and trip a debug
    /// assertion (release builds keep the first and log).
    pub fn build(candidates: Vec<Decoration>) -> Self {
        let mut seen = HashSet::new();
        let mut candidates: Vec<Decoration> = candidates
            .into_iter()
            .filter(|d| d.from <= d.to && seen.insert(d.clone()))
            .collect();
        candidates.sort_by(|a, b| {
            b.priority()
                .cmp(&a.priority())
                .then(a.from.cmp(&b.from))
                .then(b.to.cmp(&a.to))
        });

        let mut atomic = Occupancy::default();
        let mut marks = Occupancy::default();
        let mut accepted = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let priority = candidate.priority();
            match &candidate.kind {
                DecorationKind::Line { .. } => accepted.push(candidate),
                DecorationKind::Mark { .. } => {
                    for piece in subtract(&candidate.range(), &atomic) {
                        if admit(&marks, &piece, priority, &candidate) {
                            marks.insert(piece.clone(), priority);
                            let mut split = candidate.clone();
                            split.from = piece.start;
                            split.to = piece.end;
                            accepted.push(split);
                        }
                    }
                }
                DecorationKind::Hide | DecorationKind::Replace { .. } => {
                    let range = candidate.range();
                    if admit(&atomic, &range, priority, &candidate) {
                        atomic.insert(range, priority);
                        accepted.push(candidate);
                    }
                }
            }
        }

        accepted.sort_by(|a, b| {
            a.from
                .cmp(&b.from)
                .then(a.to.cmp(&b.to))
                .then(b.priority().cmp(&a.priority()))
        });
        Self {
            decorations: accepted,
        }
    }

    /// Swap every widget for its canonical instance and close the rebuild.
    pub fn intern(&mut self, registry: &mut WidgetRegistry) -> ReuseStats {
        registry.intern_all(&mut self.decorations);
        registry.finish_rebuild()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Decoration> {
        self.decorations.iter()
    }

    pub fn as_slice(&self) -> &[Decoration] {
        &self.decorations
    }

    pub fn len(&self) -> usize {
        self.decorations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decorations.is_empty()
    }

    /// Hides and replacements covering `pos` (`from <= pos < to`).
    pub fn occluding_at(&self, pos: usize) -> impl Iterator<Item = &Decoration> {
        self.decorations
            .iter()
            .filter(move |d| d.is_occluding() && d.from <= pos && pos < d.to)
    }

    /// Text a host would display: hidden spans removed, widgets replaced by
    /// their textual form. Marks and line attributes do not change text.
    pub fn project(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut cursor = 0;
        for decoration in self.decorations.iter().filter(|d| d.is_occluding()) {
            if decoration.from < cursor {
                continue;
            }
            out.push_str(text.get(cursor..decoration.from).unwrap_or_default());
            if let Some(widget) = decoration.widget() {
                out.push_str(&widget.text());
            }
            cursor = decoration.to;
        }
        out.push_str(text.get(cursor..).unwrap_or_default());
        out
    }
}

impl<'a> IntoIterator for &'a DecorationSet {
    type Item = &'a Decoration;
    type IntoIter = std::slice::Iter<'a, Decoration>;

    fn into_iter(self) -> Self::IntoIter {
        self.decorations.iter()
    }
}

/// Decide whether `range` may join `occupied`, which holds only spans of
/// priority >= `priority`.
fn admit(
    occupied: &Occupancy,
    range: &Range<usize>,
    priority: Priority,
    candidate: &Decoration,
) -> bool {
    let Some((existing, existing_priority)) = occupied.overlapping(range).next() else {
        return true;
    };
    if *existing_priority > priority {
        log::trace!(
            target: LOG_TARGET,
            "{:?} {}..{} loses to {:?} {}..{}",
            priority,
            range.start,
            range.end,
            existing_priority,
            existing.start,
            existing.end
        );
        return false;
    }
    if !contains(existing, range) {
        debug_assert!(
            false,
            "crossing {:?} decorations {}..{} and {}..{}: {:?}",
            priority, existing.start, existing.end, range.start, range.end, candidate
        );
        log::warn!(
            target: LOG_TARGET,
            "Dropping {:?} decoration {}..{} crossing {}..{}",
            priority,
            range.start,
            range.end,
            existing.start,
            existing.end
        );
    }
    false
}

/// Parts of `range` not covered by `occupied`.
fn subtract(range: &Range<usize>, occupied: &Occupancy) -> Vec<Range<usize>> {
    let mut pieces = Vec::new();
    let mut start = range.start;
    for (taken, _) in occupied.overlapping(range) {
        if taken.start > start {
            pieces.push(start..taken.start);
        }
        start = start.max(taken.end);
    }
    if start < range.end {
        pieces.push(start..range.end);
    }
    pieces
}
