//! Cache Statistics Module
//!
//! Snapshot of what is on disk: how many records, how many still valid, and
//! how many bytes they take.

use std::path::PathBuf;

use serde::Serialize;

// == Cache Stats ==
/// Result of a read-only scan over the storage directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of records found
    pub total_count: usize,
    /// Records still within their TTL
    pub valid_count: usize,
    /// Records past their TTL, plus unreadable ones
    pub expired_count: usize,
    /// Sum of record file sizes in bytes
    pub total_bytes: u64,
    /// Directory that was scanned
    pub storage_root: PathBuf,
}

impl CacheStats {
    // == Constructor ==
    /// Creates empty statistics for the given directory.
    pub fn new(storage_root: impl Into<PathBuf>) -> Self {
        Self {
            storage_root: storage_root.into(),
            ..Self::default()
        }
    }

    // == Valid Ratio ==
    /// Fraction of records that are still valid, or 0.0 for an empty cache.
    pub fn valid_ratio(&self) -> f64 {
        if self.total_count == 0 {
            0.0
        } else {
            self.valid_count as f64 / self.total_count as f64
        }
    }

    // == Record Valid ==
    /// Counts a valid record of `bytes` size.
    pub fn record_valid(&mut self, bytes: u64) {
        self.valid_count += 1;
        self.total_count += 1;
        self.total_bytes += bytes;
    }

    // == Record Expired ==
    /// Counts an expired or corrupt record of `bytes` size.
    pub fn record_expired(&mut self, bytes: u64) {
        self.expired_count += 1;
        self.total_count += 1;
        self.total_bytes += bytes;
    }
}
