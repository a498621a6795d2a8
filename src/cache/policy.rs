//! Expiration Policy Module
//!
//! Decides whether a stored entry is still valid for a fixed TTL.

use chrono::{DateTime, Duration, Utc};

use crate::cache::CacheEntry;

const MAX_TTL_SECS: i64 = i64::MAX / 1000;

// == Expiration Policy ==
/// TTL-based validity check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpirationPolicy {
    ttl_secs: u64,
}

impl ExpirationPolicy {
    /// Creates a policy with the given TTL in seconds.
    pub fn new(ttl_secs: u64) -> Self {
        Self { ttl_secs }
    }

    /// TTL in seconds.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    // == Is Valid ==
    /// Checks whether the entry is still valid at `now`.
    ///
    /// Boundary condition: an entry whose age equals the TTL exactly is still
    /// valid; it expires once the age exceeds the TTL.
    pub fn is_valid(&self, entry: &CacheEntry, now: DateTime<Utc>) -> bool {
        // chrono durations are capped at i64::MAX milliseconds
        let secs = self.ttl_secs.min(MAX_TTL_SECS as u64) as i64;
        entry.age(now) <= Duration::seconds(secs)
    }

    /// Checks a possibly unreadable entry; `None` (corrupt) is never valid.
    pub fn is_valid_opt(&self, entry: Option<&CacheEntry>, now: DateTime<Utc>) -> bool {
        entry.is_some_and(|e| self.is_valid(e, now))
    }
}
