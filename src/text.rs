//! Text primitives for the overlay engine.
//!
//! This module provides:
//! - `Document`: a versioned, immutable text buffer with a line index
//! - `ChangeSet`: edits between two versions plus position mapping
//! - Content hashing for cache keys

mod changes;
mod document;
mod hash;

pub use changes::{Assoc, Change, ChangeSet};
pub use document::{Document, Line, compute_line_starts};
pub use hash::{fnv1a_hash, fnv1a_hash_fields};
