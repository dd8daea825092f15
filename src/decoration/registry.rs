use std::collections::HashSet;
use std::sync::Arc;

use super::{Decoration, DecorationKind, Widget};

/// Counts from the last completed rebuild.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReuseStats {
    pub reused: usize,
    pub created: usize,
}

/// Deduplicates widgets across rebuilds.
///
/// A widget equal to one handed out by the previous rebuild is replaced by
/// that earlier `Arc`, so a host comparing with `Arc::ptr_eq` skips redraws.
/// Entries the current rebuild does not use are released when it finishes.
#[derive(Debug, Default)]
pub struct WidgetRegistry {
    previous: HashSet<Arc<Widget>>,
    current: HashSet<Arc<Widget>>,
    stats: ReuseStats,
    last: ReuseStats,
}

impl WidgetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical instance for `widget`.
    pub fn intern(&mut self, widget: Arc<Widget>) -> Arc<Widget> {
        if let Some(existing) = self.current.get(widget.as_ref()) {
            return existing.clone();
        }
        let canonical = match self.previous.take(widget.as_ref()) {
            Some(previous) => {
                self.stats.reused += 1;
                previous
            }
            None => {
                self.stats.created += 1;
                widget
            }
        };
        self.current.insert(canonical.clone());
        canonical
    }

    /// Intern every widget carried by `decorations`.
    pub fn intern_all(&mut self, decorations: &mut [Decoration]) {
        for decoration in decorations {
            if let DecorationKind::Replace { widget, .. } = &mut decoration.kind {
                *widget = self.intern(widget.clone());
            }
        }
    }

    /// Close the current rebuild; unused widgets from the previous one are dropped.
    pub fn finish_rebuild(&mut self) -> ReuseStats {
        self.previous = std::mem::take(&mut self.current);
        self.last = std::mem::take(&mut self.stats);
        self.last
    }

    pub fn last_stats(&self) -> ReuseStats {
        self.last
    }

    /// Forget everything, e.g. after a cache clear changed what widgets show.
    pub fn clear(&mut self) {
        self.previous.clear();
        self.current.clear();
        self.stats = ReuseStats::default();
    }
}
