//! Hash utilities for content-based caching.
//!
//! Diagram renders are keyed by a hash of their language and source, so the
//! hash must be stable across runs and platforms. `std`'s `DefaultHasher`
//! makes no such promise; FNV-1a does.

const FNV_OFFSET: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// Compute FNV-1a 64-bit hash of text content.
///
/// FNV-1a is fast and non-cryptographic. It is fine for cache keys and
/// change detection, not for anything adversarial.
///
/// # Example
///
/// ```
/// use livemark::text::fnv1a_hash;
///
/// assert_eq!(fnv1a_hash("graph TD"), fnv1a_hash("graph TD"));
/// assert_ne!(fnv1a_hash("graph TD"), fnv1a_hash("graph LR"));
/// ```
#[inline]
pub fn fnv1a_hash(text: &str) -> u64 {
    fnv1a_extend(FNV_OFFSET, text.as_bytes())
}

/// Hash several fields as one value.
///
/// Each field is followed by a 0xff byte, which never occurs in UTF-8, so
/// `("ab", "c")` and `("a", "bc")` hash differently.
pub fn fnv1a_hash_fields(fields: &[&str]) -> u64 {
    fields.iter().fold(FNV_OFFSET, |hash, field| {
        fnv1a_extend(fnv1a_extend(hash, field.as_bytes()), &[0xff])
    })
}

#[inline]
fn fnv1a_extend(mut hash: u64, bytes: &[u8]) -> u64 {
    for byte in bytes {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}
