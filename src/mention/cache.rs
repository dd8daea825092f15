use std::sync::Arc;

use dashmap::DashMap;

use super::{CompletionItem, LOG_TARGET};

/// Completion items remembered by label, shared by clones.
///
/// New labels are added; a label already present keeps its first item.
#[derive(Debug, Clone, Default)]
pub struct MentionDetailCache {
    items: Arc<DashMap<String, CompletionItem>>,
}

impl MentionDetailCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add every item whose label is not cached yet. Returns how many were new.
    pub fn merge(&self, items: &[CompletionItem]) -> usize {
        let mut added = 0;
        for item in items {
            self.items.entry(item.label.clone()).or_insert_with(|| {
                added += 1;
                item.clone()
            });
        }
        if added > 0 {
            log::trace!(target: LOG_TARGET, "Cached {} new mention details", added);
        }
        added
    }

    /// The cached detail text for `label`.
    pub fn detail(&self, label: &str) -> Option<String> {
        self.items.get(label)?.detail.clone()
    }

    pub fn item(&self, label: &str) -> Option<CompletionItem> {
        self.items.get(label).map(|item| item.value().clone())
    }

    pub fn clear(&self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
