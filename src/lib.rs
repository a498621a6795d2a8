//! filecache - A persistent key/value cache
//!
//! Stores one JSON file per entry, hashed by key, and expires entries after a
//! fixed TTL.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheManager, CacheStats};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::spawn_cleanup_task;
