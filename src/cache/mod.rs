//! Cache Module
//!
//! Provides a file-backed key/value cache with TTL expiration.

mod entry;
mod hasher;
mod manager;
mod payload;
mod policy;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use hasher::{hash_key, IDENTIFIER_LEN};
pub use manager::CacheManager;
pub use policy::ExpirationPolicy;
pub use stats::CacheStats;
pub use store::{EntryStore, LoadResult, RECORD_EXTENSION};
