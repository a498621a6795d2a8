//! Key Hasher Module
//!
//! Maps arbitrary cache keys to fixed-width, filesystem-safe identifiers.

use sha2::{Digest, Sha256};

/// Length in characters of every identifier (hex-encoded SHA-256).
pub const IDENTIFIER_LEN: usize = 64;

/// Hashes a cache key into its storage identifier.
///
/// SHA-256 of the UTF-8 bytes, rendered as lowercase hex. No salt, so the
/// same key always lands on the same file.
pub fn hash_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    format!("{:x}", hasher.finalize())
}
