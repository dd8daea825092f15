//! Superseding background task slots.
//!
//! A slot holds at most one running task. Registering a new task for an
//! occupied slot aborts the old one, so only the latest request of a kind
//! (the completion for the most recent keystroke, say) can deliver results.

use std::hash::Hash;

use dashmap::DashMap;
use tokio::task::AbortHandle;

const LOG_TARGET: &str = "livemark::tasks";

/// Tracks the active task per logical slot.
#[derive(Debug)]
pub struct TaskSlots<K: Eq + Hash> {
    active: DashMap<K, AbortHandle>,
}

impl<K: Eq + Hash> Default for TaskSlots<K> {
    fn default() -> Self {
        Self {
            active: DashMap::new(),
        }
    }
}

impl<K: Eq + Hash + std::fmt::Debug> TaskSlots<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` for `slot`, aborting the task it supersedes.
    ///
    /// Returns the superseded handle, if any.
    pub fn register(&self, slot: K, handle: AbortHandle) -> Option<AbortHandle> {
        let previous = self.active.insert(slot, handle);
        if let Some(previous) = &previous {
            previous.abort();
            log::debug!(target: LOG_TARGET, "Superseded previous task");
        }
        previous
    }

    /// Abort and forget the task in `slot`. Returns whether one was registered.
    pub fn cancel(&self, slot: &K) -> bool {
        match self.active.remove(slot) {
            Some((_, handle)) => {
                handle.abort();
                log::debug!(target: LOG_TARGET, "Cancelled task in slot {:?}", slot);
                true
            }
            None => false,
        }
    }

    /// Abort every task, e.g. when the editor is torn down.
    pub fn abort_all(&self) {
        for entry in self.active.iter() {
            entry.value().abort();
        }
        self.active.clear();
    }

    /// Whether `slot` holds a task that has not finished yet.
    pub fn is_running(&self, slot: &K) -> bool {
        self.active
            .get(slot)
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}
