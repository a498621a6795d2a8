//! Command-line interface parsing for filecache
//!
//! Parses arguments with clap and renders cache output for the terminal.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use crate::cache::CacheStats;
use crate::config::Config;

/// filecache - persistent key/value cache with TTL expiration
#[derive(Parser, Debug)]
#[command(name = "filecache")]
#[command(about = "Persistent key/value cache with TTL expiration")]
#[command(version)]
pub struct Cli {
    /// Storage directory (overrides CACHE_DIR)
    #[arg(long, global = true, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// Entry time-to-live in seconds (overrides CACHE_TTL)
    #[arg(long, global = true, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub ttl: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// Cache operations exposed on the command line
#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Store a value; VALUE is parsed as JSON, or kept as a plain string
    Set { key: String, value: String },
    /// Print the value stored under KEY as JSON (exit code 1 on a miss)
    Get { key: String },
    /// Remove KEY
    Delete { key: String },
    /// Remove every entry
    Clear,
    /// Show entry counts and disk usage
    Stats {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Remove expired and unreadable entries once
    Cleanup,
    /// Keep removing expired entries periodically until interrupted
    Sweep {
        /// Seconds between sweeps (overrides CACHE_CLEANUP_INTERVAL)
        #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
}

impl Cli {
    /// Applies command-line overrides on top of a loaded configuration.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(dir) = &self.dir {
            config.cache_dir = dir.clone();
        }
        if let Some(ttl) = self.ttl {
            config.default_ttl = ttl;
        }
        if let Command::Sweep {
            interval: Some(interval),
        } = self.command
        {
            config.cleanup_interval = interval;
        }
        config
    }
}

/// Parses a command-line value as JSON, falling back to a plain string.
///
/// `42` becomes a number and `{"a":1}` an object, while `hello` is stored as
/// the string `"hello"`.
pub fn parse_payload(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Renders statistics as an aligned table.
pub fn format_stats(stats: &CacheStats) -> String {
    format!(
        "Cache directory: {}\n\
         Total entries:   {}\n\
         Valid entries:   {}\n\
         Expired entries: {}\n\
         Total size:      {}",
        stats.storage_root.display(),
        stats.total_count,
        stats.valid_count,
        stats.expired_count,
        format_bytes(stats.total_bytes),
    )
}

/// Formats a byte count with a binary unit suffix.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{} B", bytes);
    }

    let mut size = bytes as f64;
    let mut unit = "B";
    for next in UNITS {
        if size < 1024.0 {
            break;
        }
        size /= 1024.0;
        unit = next;
    }
    format!("{:.1} {}", size, unit)
}
