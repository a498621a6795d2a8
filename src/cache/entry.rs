//! Cache Entry Module
//!
//! Defines the record persisted for each cache key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

// == Cache Entry ==
/// The persisted unit: payload plus metadata.
///
/// Serialized as `{ "payload": ..., "created_at": "<RFC 3339>", "key": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The cached value, opaque to the cache
    pub payload: Value,
    /// When the entry was written
    pub created_at: DateTime<Utc>,
    /// Original key, kept for diagnostics
    pub key: String,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new entry stamped with the current time.
    pub fn new(key: impl Into<String>, payload: Value) -> Self {
        Self::with_created_at(key, payload, Utc::now())
    }

    /// Creates an entry with an explicit creation time.
    pub fn with_created_at(key: impl Into<String>, payload: Value, created_at: DateTime<Utc>) -> Self {
        Self {
            payload,
            created_at,
            key: key.into(),
        }
    }

    // == Age ==
    /// Time elapsed between creation and `now`.
    ///
    /// Negative when the entry was stamped in the future (clock skew).
    pub fn age(&self, now: DateTime<Utc>) -> chrono::Duration {
        now.signed_duration_since(self.created_at)
    }
}
