//! Content hashes recorded for direct downloads
//!
//! A direct URL without `ETag` or `Last-Modified` headers is checked for
//! updates by hashing the bytes it serves.

/// Prefix marking the hash algorithm in stored values
pub const HASH_PREFIX: &str = "blake3:";

/// `blake3:<hex>` digest of `bytes`
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{HASH_PREFIX}{}", blake3::hash(bytes).to_hex())
}

/// Whether a stored hash still describes `bytes`
///
/// Stored values without the prefix are accepted as bare hex digests.
pub fn matches_bytes(stored: &str, bytes: &[u8]) -> bool {
    let current = hash_bytes(bytes);
    stored == current || current.strip_prefix(HASH_PREFIX) == Some(stored)
}
