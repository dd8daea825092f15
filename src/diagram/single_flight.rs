//! Thread-safe set of keys with a request in flight.

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::{Arc, Mutex};

use crate::error::LockResultExt;

/// Keys whose operation is currently running.
///
/// Cheaply cloneable for sharing with spawned tasks. `try_start` is the
/// atomic "am I the one who starts this" check.
#[derive(Debug, Clone)]
pub struct InFlight<T> {
    items: Arc<Mutex<HashSet<T>>>,
}

impl<T: Eq + Hash + Clone> InFlight<T> {
    pub fn new() -> Self {
        Self {
            items: Arc::new(Mutex::new(HashSet::new())),
        }
    }

    /// Returns `true` if this call started the operation, `false` if it was
    /// already running.
    pub fn try_start(&self, item: &T) -> bool {
        match self.items.lock().recover_poison("InFlight::try_start") {
            Ok(mut items) => items.insert(item.clone()),
            Err(_) => false,
        }
    }

    pub fn finish(&self, item: &T) {
        if let Ok(mut items) = self.items.lock().recover_poison("InFlight::finish") {
            items.remove(item);
        }
    }

    pub fn contains(&self, item: &T) -> bool {
        self.items
            .lock()
            .recover_poison("InFlight::contains")
            .map(|items| items.contains(item))
            .unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.items
            .lock()
            .recover_poison("InFlight::len")
            .map(|items| items.len())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Eq + Hash + Clone> Default for InFlight<T> {
    fn default() -> Self {
        Self::new()
    }
}
