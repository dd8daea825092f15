use std::fmt;

use serde::Serialize;

use crate::text::fnv1a_hash_fields;

/// Cache key for a diagram: hash of its language and source text.
///
/// The fields are hashed with a separator, so `("ab", "c")` and `("a", "bc")`
/// get different keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ContentKey(u64);

impl ContentKey {
    pub fn new(language: &str, source: &str) -> Self {
        Self(fnv1a_hash_fields(&[language, source]))
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
