//! Cleanup Sweep Task
//!
//! Background task that periodically removes expired and unreadable cache entries.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::CacheManager;

/// Spawns a background task that periodically runs `CacheManager::cleanup`.
///
/// The task runs in an infinite loop, sleeping for the specified interval
/// between sweeps. Each sweep runs on the blocking pool since it walks the
/// storage directory with synchronous file I/O.
///
/// # Arguments
/// * `cache` - Manager to sweep; clones share the same storage directory
/// * `cleanup_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort it on shutdown.
///
/// # Example
/// ```ignore
/// let cache = CacheManager::new("/tmp/cache", 300)?;
/// let sweep = spawn_cleanup_task(cache.clone(), 60);
/// // Later, during shutdown:
/// sweep.abort();
/// ```
pub fn spawn_cleanup_task(cache: CacheManager, cleanup_interval_secs: u64) -> JoinHandle<()> {
    let interval = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting cache cleanup task with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let sweeper = cache.clone();
            match tokio::task::spawn_blocking(move || sweeper.cleanup()).await {
                Ok(removed) if removed > 0 => {
                    info!("Cache cleanup: removed {} invalid entries", removed)
                }
                Ok(_) => debug!("Cache cleanup: no invalid entries found"),
                Err(e) => warn!("Cache cleanup sweep failed: {}", e),
            }
        }
    })
}
