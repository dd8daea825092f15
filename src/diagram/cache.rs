use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{ContentKey, LOG_TARGET};
use crate::decoration::DiagramView;

/// Terminal outcome of one render request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagramCacheEntry {
    Rendered { content: String },
    Failed { message: String },
}

impl DiagramCacheEntry {
    pub fn is_error(&self) -> bool {
        matches!(self, DiagramCacheEntry::Failed { .. })
    }

    /// Rendered content or error text, whichever this entry holds.
    pub fn content(&self) -> &str {
        match self {
            DiagramCacheEntry::Rendered { content } => content,
            DiagramCacheEntry::Failed { message } => message,
        }
    }

    pub fn view(&self) -> DiagramView {
        match self {
            DiagramCacheEntry::Rendered { content } => DiagramView::Rendered {
                svg: content.clone(),
            },
            DiagramCacheEntry::Failed { message } => DiagramView::Failed {
                message: message.clone(),
            },
        }
    }
}

/// Process-lifetime map from content key to render outcome.
///
/// Clones share the same map. Entries are written once; a second insert for
/// the same key is ignored so concurrent deliveries agree on one outcome.
/// Absence means the diagram is still loading.
#[derive(Debug, Clone, Default)]
pub struct DiagramCache {
    entries: Arc<DashMap<ContentKey, Arc<DiagramCacheEntry>>>,
}

impl DiagramCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &ContentKey) -> Option<Arc<DiagramCacheEntry>> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    pub fn contains(&self, key: &ContentKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Store `entry` unless the key already has one. Returns whether it was stored.
    pub fn insert_if_absent(&self, key: ContentKey, entry: DiagramCacheEntry) -> bool {
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::new(entry));
                true
            }
        }
    }

    /// Drop one entry so the next sighting of the key fetches again.
    pub fn invalidate(&self, key: &ContentKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            log::debug!(target: LOG_TARGET, "Invalidated diagram {}", key);
        }
        removed
    }

    pub fn clear(&self) {
        let count = self.entries.len();
        self.entries.clear();
        log::debug!(target: LOG_TARGET, "Cleared {} cached diagrams", count);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(content: &str) -> DiagramCacheEntry {
        DiagramCacheEntry::Rendered {
            content: content.to_string(),
        }
    }

    #[test]
    fn first_insert_wins() {
        let cache = DiagramCache::new();
        let key = ContentKey::new("mermaid", "A");

        assert!(cache.insert_if_absent(key, rendered("<svg>1</svg>")));
        assert!(!cache.insert_if_absent(key, rendered("<svg>2</svg>")));

        assert_eq!(cache.get(&key).unwrap().content(), "<svg>1</svg>");
    }

    #[test]
    fn failures_are_cached_too() {
        let cache = DiagramCache::new();
        let key = ContentKey::new("mermaid", "broken");
        cache.insert_if_absent(
            key,
            DiagramCacheEntry::Failed {
                message: "syntax error".to_string(),
            },
        );

        let entry = cache.get(&key).unwrap();
        assert!(entry.is_error());
        assert_eq!(
            entry.view(),
            DiagramView::Failed {
                message: "syntax error".to_string()
            }
        );
    }

    #[test]
    fn clones_share_entries() {
        let cache = DiagramCache::new();
        let shared = cache.clone();
        let key = ContentKey::new("d2", "x");
        shared.insert_if_absent(key, rendered("<svg/>"));
        assert!(cache.contains(&key));
    }

    #[test]
    fn invalidate_and_clear() {
        let cache = DiagramCache::new();
        let a = ContentKey::new("d2", "a");
        let b = ContentKey::new("d2", "b");
        cache.insert_if_absent(a, rendered("a"));
        cache.insert_if_absent(b, rendered("b"));

        assert!(cache.invalidate(&a));
        assert!(!cache.invalidate(&a));
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
    }
}
