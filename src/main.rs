//! filecache - persistent key/value cache with TTL expiration
//!
//! Command-line front end over `CacheManager`.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use filecache::cli::{format_stats, parse_payload, Cli, Command};
use filecache::{spawn_cleanup_task, CacheManager, Config};

/// Main entry point for the filecache CLI.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging (stderr)
/// 2. Load configuration from environment variables, then apply CLI flags
/// 3. Open the cache manager over the configured directory
/// 4. Run the requested command
#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filecache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = cli.apply(Config::from_env());

    let cache = CacheManager::from_config(&config).with_context(|| {
        format!("failed to open cache at {}", config.cache_dir.display())
    })?;

    run(cli.command, cache, config.cleanup_interval).await
}

async fn run(command: Command, cache: CacheManager, cleanup_interval: u64) -> anyhow::Result<ExitCode> {
    match command {
        Command::Set { key, value } => Ok(status(cache.set(&key, &parse_payload(&value)))),
        Command::Get { key } => match cache.get::<serde_json::Value>(&key) {
            Some(payload) => {
                println!("{}", serde_json::to_string_pretty(&payload)?);
                Ok(ExitCode::SUCCESS)
            }
            None => Ok(ExitCode::FAILURE),
        },
        Command::Delete { key } => Ok(status(cache.delete(&key))),
        Command::Clear => Ok(status(cache.clear())),
        Command::Stats { json } => {
            let stats = cache.stats();
            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("{}", format_stats(&stats));
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Cleanup => {
            println!("{}", cache.cleanup());
            Ok(ExitCode::SUCCESS)
        }
        Command::Sweep { .. } => {
            info!(
                "Sweeping {} every {}s (ttl={}s)",
                cache.storage_root().display(),
                cleanup_interval,
                cache.ttl_secs()
            );
            let handle = spawn_cleanup_task(cache, cleanup_interval);
            shutdown_signal().await;
            handle.abort();
            warn!("Cleanup task aborted");
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn status(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, stopping sweep...");
        }
        _ = terminate => {
            info!("Received SIGTERM, stopping sweep...");
        }
    }
}
