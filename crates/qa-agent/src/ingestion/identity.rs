//! Content-addressed chunk identifiers
//!
//! The id is a SHA-256 over `"{source}_{index}_{prefix}"`, where `prefix` is
//! the first [`ID_PREFIX_CHARS`] characters of the chunk text. It is an
//! idempotency key for re-ingestion, not an integrity check: two chunks that
//! share source, index and prefix map to the same id even if their tails
//! differ.

use sha2::{Digest, Sha256};

/// Number of leading characters of the chunk text that feed the id
pub const ID_PREFIX_CHARS: usize = 100;

/// Derive the storage id of a chunk
pub fn chunk_id(text: &str, source: &str, index: usize) -> String {
    let prefix = match text.char_indices().nth(ID_PREFIX_CHARS) {
        Some((byte_pos, _)) => &text[..byte_pos],
        None => text,
    };

    let mut hasher = Sha256::new();
    hasher.update(format!("{}_{}_{}", source, index, prefix).as_bytes());
    hex::encode(hasher.finalize())
}
