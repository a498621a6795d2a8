//! Configuration Module
//!
//! Supplies the storage root and default TTL from environment variables.

use std::env;
use std::path::PathBuf;

use directories::ProjectDirs;

/// Default TTL in seconds when `CACHE_TTL` is unset or invalid
pub const DEFAULT_TTL_SECS: u64 = 3600;

/// Default sweep interval in seconds
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 60;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding one file per cache entry
    pub cache_dir: PathBuf,
    /// TTL in seconds applied to every entry
    pub default_ttl: u64,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_DIR` - Storage directory (default: platform cache dir for `filecache`)
    /// - `CACHE_TTL` - TTL in seconds (default: 3600)
    /// - `CACHE_CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    ///
    /// Zero or unparsable numbers fall back to the defaults.
    pub fn from_env() -> Self {
        Self {
            cache_dir: env::var_os("CACHE_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_cache_dir),
            default_ttl: positive_env("CACHE_TTL").unwrap_or(DEFAULT_TTL_SECS),
            cleanup_interval: positive_env("CACHE_CLEANUP_INTERVAL")
                .unwrap_or(DEFAULT_CLEANUP_INTERVAL_SECS),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            default_ttl: DEFAULT_TTL_SECS,
            cleanup_interval: DEFAULT_CLEANUP_INTERVAL_SECS,
        }
    }
}

/// XDG-style cache directory (`~/.cache/filecache/` on Linux), or `./cache`
/// when no home directory can be determined.
pub fn default_cache_dir() -> PathBuf {
    ProjectDirs::from("", "", "filecache")
        .map(|dirs| dirs.cache_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("cache"))
}

fn positive_env(name: &str) -> Option<u64> {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .filter(|v: &u64| *v > 0)
}
