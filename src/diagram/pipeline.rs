use std::sync::Arc;

use tokio::sync::mpsc;

use super::{
    ContentKey, DiagramCache, DiagramCacheEntry, DiagramRenderer, InFlight, LOG_TARGET,
    svg_height,
};

/// A fetch requested by the diagram handler during a rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramRequest {
    pub key: ContentKey,
    pub language: String,
    pub source: String,
    /// Span of the fenced block in the requesting document version.
    pub from: usize,
    pub to: usize,
    pub version: u64,
}

/// Render outcome pushed back to the host, which dispatches it as an effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramDelivery {
    pub key: ContentKey,
    pub language: String,
    /// Rendered SVG, or the error text when `is_error` is set.
    pub content: String,
    pub is_error: bool,
    pub from: usize,
    pub to: usize,
    pub height: Option<u32>,
    /// Document version the request was made against.
    pub version: u64,
}

/// Fetches diagrams in the background, at most once per content key.
///
/// Must be used from within a tokio runtime.
pub struct DiagramPipeline<R> {
    renderer: Arc<R>,
    cache: DiagramCache,
    in_flight: InFlight<ContentKey>,
    deliveries: mpsc::UnboundedSender<DiagramDelivery>,
}

impl<R: DiagramRenderer> DiagramPipeline<R> {
    /// Create a pipeline writing into `cache`. Deliveries arrive on the
    /// returned receiver.
    pub fn new(
        renderer: R,
        cache: DiagramCache,
    ) -> (Self, mpsc::UnboundedReceiver<DiagramDelivery>) {
        let (deliveries, receiver) = mpsc::unbounded_channel();
        let pipeline = Self {
            renderer: Arc::new(renderer),
            cache,
            in_flight: InFlight::new(),
            deliveries,
        };
        (pipeline, receiver)
    }

    pub fn cache(&self) -> &DiagramCache {
        &self.cache
    }

    /// Number of requests currently out.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Start fetching `request` unless its key is cached or already in flight.
    ///
    /// Returns `true` when this call issued the outbound request.
    pub fn request(&self, request: DiagramRequest) -> bool {
        let key = request.key;
        if self.cache.contains(&key) {
            return false;
        }
        if !self.in_flight.try_start(&key) {
            log::trace!(target: LOG_TARGET, "Diagram {} already in flight", key);
            return false;
        }
        // A fetch may have finished between the cache check and try_start
        if self.cache.contains(&key) {
            self.in_flight.finish(&key);
            return false;
        }

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                log::warn!(
                    target: LOG_TARGET,
                    "Cannot fetch diagram {} outside a runtime: {}",
                    key,
                    e
                );
                self.in_flight.finish(&key);
                return false;
            }
        };

        log::debug!(
            target: LOG_TARGET,
            "Fetching {} diagram {} for version {}",
            request.language,
            key,
            request.version
        );

        let renderer = self.renderer.clone();
        let cache = self.cache.clone();
        let in_flight = self.in_flight.clone();
        let deliveries = self.deliveries.clone();

        runtime.spawn(async move {
            let entry = match renderer.render(&request.language, &request.source).await {
                Ok(content) => DiagramCacheEntry::Rendered { content },
                Err(e) => {
                    log::warn!(
                        target: LOG_TARGET,
                        "Rendering {} diagram {} failed: {}",
                        request.language,
                        key,
                        e
                    );
                    DiagramCacheEntry::Failed {
                        message: e.to_string(),
                    }
                }
            };

            cache.insert_if_absent(key, entry);
            in_flight.finish(&key);

            // Deliver whatever the cache settled on
            let Some(stored) = cache.get(&key) else {
                return;
            };
            let delivery = DiagramDelivery {
                key,
                language: request.language,
                height: match stored.as_ref() {
                    DiagramCacheEntry::Rendered { content } => svg_height(content),
                    DiagramCacheEntry::Failed { .. } => None,
                },
                content: stored.content().to_string(),
                is_error: stored.is_error(),
                from: request.from,
                to: request.to,
                version: request.version,
            };
            if deliveries.send(delivery).is_err() {
                log::debug!(
                    target: LOG_TARGET,
                    "Delivery receiver dropped; diagram {} stays cached only",
                    key
                );
            }
        });
        true
    }
}
