//! Content digest calculation.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of a buffer as a lowercase hex string.
///
/// Deterministic: identical bytes always yield the identical digest. The
/// digest doubles as the content-identity key for deduplication.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}
