//! Mention subsystem.
//!
//! Typing `@` at a word start opens a completion query against a
//! host-provided source. Every item the source returns is remembered by label
//! in a long-lived detail cache; the mention handler later reads that cache
//! to annotate accepted `@name` mentions without querying again.

mod cache;
mod completer;
mod trigger;

pub use cache::MentionDetailCache;
pub use completer::{CompletionError, CompletionItem, CompletionSource, MentionCompleter};
pub use trigger::{MentionQuery, find_trigger, mention_spans};

pub(crate) const LOG_TARGET: &str = "livemark::mention";
