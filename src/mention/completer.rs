use std::future::Future;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::task::JoinHandle;

use super::{LOG_TARGET, MentionDetailCache, MentionQuery};
use crate::tasks::TaskSlots;

/// One completion suggestion from the host's source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
}

impl CompletionItem {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    #[error("completion source failed: {0}")]
    Source(String),
}

/// Host-provided completion source.
pub trait CompletionSource: Send + Sync + 'static {
    fn complete(
        &self,
        prefix: &str,
    ) -> impl Future<Output = Result<Vec<CompletionItem>, CompletionError>> + Send;
}

/// Slot key for the completion task; one popup per editor.
const COMPLETION_SLOT: &str = "mention-completion";

/// Runs mention queries against a source and feeds the detail cache.
pub struct MentionCompleter<S> {
    source: Arc<S>,
    cache: MentionDetailCache,
    slots: Arc<TaskSlots<&'static str>>,
}

impl<S: CompletionSource> MentionCompleter<S> {
    pub fn new(source: S, cache: MentionDetailCache) -> Self {
        Self {
            source: Arc::new(source),
            cache,
            slots: Arc::new(TaskSlots::new()),
        }
    }

    pub fn cache(&self) -> &MentionDetailCache {
        &self.cache
    }

    /// Query the source for `query`. A failing source yields no suggestions.
    pub async fn complete(&self, query: &MentionQuery) -> Vec<CompletionItem> {
        run_query(self.source.as_ref(), &self.cache, query).await
    }

    /// Run `complete` in the background, superseding any query still running.
    ///
    /// The superseded task's handle resolves to a cancelled `JoinError`.
    pub fn spawn_complete(&self, query: MentionQuery) -> JoinHandle<Vec<CompletionItem>> {
        let source = self.source.clone();
        let cache = self.cache.clone();
        let task = tokio::spawn(async move { run_query(source.as_ref(), &cache, &query).await });
        self.slots.register(COMPLETION_SLOT, task.abort_handle());
        task
    }

    /// Drop the running query, e.g. when the popup closes.
    pub fn cancel(&self) -> bool {
        self.slots.cancel(&COMPLETION_SLOT)
    }
}

async fn run_query<S: CompletionSource>(
    source: &S,
    cache: &MentionDetailCache,
    query: &MentionQuery,
) -> Vec<CompletionItem> {
    match source.complete(&query.prefix).await {
        Ok(items) => {
            cache.merge(&items);
            log::debug!(
                target: LOG_TARGET,
                "{} suggestions for @{}",
                items.len(),
                query.prefix
            );
            items
        }
        Err(e) => {
            log::warn!(target: LOG_TARGET, "Mention completion failed: {}", e);
            Vec::new()
        }
    }
}
