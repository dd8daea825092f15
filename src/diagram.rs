//! Diagram render pipeline.
//!
//! Fenced code blocks in a diagram language are rendered by an external
//! service. Each distinct `(language, source)` pair is fetched at most once
//! per process: the cache holds both successful renders and failures, and
//! the single-flight tracker keeps concurrent rebuilds from issuing a second
//! request while the first is still out.
//!
//! Results never touch the overlay directly. The pipeline sends a
//! `DiagramDelivery` on a channel; the host turns it into a transaction and
//! the next rebuild picks the rendered content up from the cache.

mod cache;
mod key;
mod pipeline;
mod renderer;
mod single_flight;

pub use cache::{DiagramCache, DiagramCacheEntry};
pub use key::ContentKey;
pub use pipeline::{DiagramDelivery, DiagramPipeline, DiagramRequest};
pub use renderer::{DiagramRenderer, HttpDiagramRenderer, RenderError, svg_height};
pub use single_flight::InFlight;

pub(crate) const LOG_TARGET: &str = "livemark::diagram";
