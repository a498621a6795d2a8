//! Cache Manager Module
//!
//! Public entry point combining key hashing, file storage and TTL expiration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error, info, warn};

use crate::cache::payload::to_payload;
use crate::cache::{hash_key, CacheEntry, CacheStats, EntryStore, ExpirationPolicy, LoadResult};
use crate::config::Config;
use crate::error::{CacheError, Result};

// == Cache Manager ==
/// Persistent key/value cache with a fixed TTL.
///
/// Holds only configuration; the storage directory is the single source of
/// truth. Storage failures are logged and reported through return values,
/// never as errors. Several managers (or clones of one) may share a directory;
/// concurrent writes to the same key are last-writer-wins.
#[derive(Debug, Clone)]
pub struct CacheManager {
    /// Record storage
    store: EntryStore,
    /// Expiration policy for this instance
    policy: ExpirationPolicy,
}

impl CacheManager {
    // == Constructor ==
    /// Creates a manager over `storage_root` with the given TTL in seconds.
    ///
    /// # Errors
    /// Returns `CacheError::Config` if the TTL is zero, and `CacheError::Io`
    /// if the storage directory cannot be created.
    pub fn new(storage_root: impl Into<PathBuf>, ttl_secs: u64) -> Result<Self> {
        if ttl_secs == 0 {
            return Err(CacheError::Config("TTL must be a positive number of seconds".to_string()));
        }

        let store = EntryStore::new(storage_root);
        store.ensure_dir()?;

        Ok(Self {
            store,
            policy: ExpirationPolicy::new(ttl_secs),
        })
    }

    /// Creates a manager from configuration defaults.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.cache_dir.clone(), config.default_ttl)
    }

    /// Returns the storage directory.
    pub fn storage_root(&self) -> &Path {
        self.store.dir()
    }

    /// Returns the TTL in seconds.
    pub fn ttl_secs(&self) -> u64 {
        self.policy.ttl_secs()
    }

    /// Returns the file a key is stored in.
    pub fn entry_path(&self, key: &str) -> PathBuf {
        self.store.path_for(&hash_key(key))
    }

    // == Set ==
    /// Stores a payload under `key`, fully replacing any previous value.
    ///
    /// Returns `false` if the payload cannot be represented as JSON (including
    /// NaN or infinite floats) or the write fails; the previous record (if
    /// any) is then left untouched.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, payload: &T) -> bool {
        let payload = match to_payload(payload) {
            Ok(payload) => payload,
            Err(e) => {
                error!(key, error = %e, "failed to serialize cache payload");
                return false;
            }
        };

        let entry = CacheEntry::new(key, payload);
        match self.store.put(&hash_key(key), &entry) {
            Ok(()) => true,
            Err(e) => {
                error!(key, error = %e, "failed to write cache entry");
                false
            }
        }
    }

    // == Get ==
    /// Retrieves the payload stored under `key`.
    ///
    /// Returns `None` if the key is missing, expired or unreadable. Expired and
    /// unreadable records are deleted on the way out. A payload that exists
    /// but does not match `T` also yields `None`, and the record is kept.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let identifier = hash_key(key);

        let entry = match self.store.get(&identifier) {
            LoadResult::Absent => return None,
            LoadResult::Corrupt => {
                debug!(key, "evicting unreadable cache entry");
                self.remove_identifier(&identifier);
                return None;
            }
            LoadResult::Found(entry) => entry,
        };

        if !self.policy.is_valid(&entry, Utc::now()) {
            debug!(key, "evicting expired cache entry");
            self.remove_identifier(&identifier);
            return None;
        }

        match serde_json::from_value(entry.payload) {
            Ok(payload) => Some(payload),
            Err(e) => {
                warn!(key, error = %e, "cached payload does not match requested type");
                None
            }
        }
    }

    // == Delete ==
    /// Removes `key`. Returns `true` also when nothing was stored.
    pub fn delete(&self, key: &str) -> bool {
        match self.store.delete(&hash_key(key)) {
            Ok(()) => true,
            Err(e) => {
                error!(key, error = %e, "failed to delete cache entry");
                false
            }
        }
    }

    // == Clear ==
    /// Removes every entry. Returns `false` if any record could not be removed.
    pub fn clear(&self) -> bool {
        match self.store.clear() {
            Ok(()) => {
                info!(dir = %self.storage_root().display(), "cache cleared");
                true
            }
            Err(e) => {
                error!(error = %e, "failed to clear cache");
                false
            }
        }
    }

    // == Stats ==
    /// Scans the storage directory without modifying it.
    ///
    /// Unreadable records are counted as expired. Records that vanish during
    /// the scan are skipped.
    pub fn stats(&self) -> CacheStats {
        let mut stats = CacheStats::new(self.storage_root());

        for identifier in self.scan_identifiers() {
            let Some(bytes) = self.store.size_of(&identifier) else {
                continue;
            };

            match self.store.get(&identifier) {
                LoadResult::Absent => continue,
                LoadResult::Corrupt => stats.record_expired(bytes),
                LoadResult::Found(entry) => {
                    if self.policy.is_valid(&entry, Utc::now()) {
                        stats.record_valid(bytes);
                    } else {
                        stats.record_expired(bytes);
                    }
                }
            }
        }

        stats
    }

    // == Cleanup ==
    /// Deletes every expired or unreadable record.
    ///
    /// Returns the number of records removed. Temporary files left behind by
    /// interrupted writes are also removed once older than the TTL; they are
    /// not records and are not counted.
    pub fn cleanup(&self) -> usize {
        let mut removed = 0;

        for identifier in self.scan_identifiers() {
            let entry = match self.store.get(&identifier) {
                LoadResult::Absent => continue,
                LoadResult::Corrupt => None,
                LoadResult::Found(entry) => Some(entry),
            };

            if self.policy.is_valid_opt(entry.as_ref(), Utc::now()) {
                continue;
            }

            if self.remove_identifier(&identifier) {
                removed += 1;
            }
        }

        let stale = self
            .store
            .remove_stale_temp_files(Duration::from_secs(self.ttl_secs()));
        if stale > 0 {
            info!(stale, "cleanup removed abandoned temporary files");
        }

        if removed > 0 {
            info!(removed, "cleanup removed invalid cache entries");
        } else {
            debug!("cleanup found no invalid cache entries");
        }
        removed
    }

    fn scan_identifiers(&self) -> Vec<String> {
        self.store.list_identifiers().unwrap_or_else(|e| {
            error!(error = %e, "failed to list cache entries");
            Vec::new()
        })
    }

    fn remove_identifier(&self, identifier: &str) -> bool {
        match self.store.delete(identifier) {
            Ok(()) => true,
            Err(e) => {
                warn!(identifier, error = %e, "failed to remove invalid cache entry");
                false
            }
        }
    }
}
