// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Convoy Daemon (convoyd)
//!
//! Background process that keeps convoys fed and closed.
//!
//! Architecture:
//! - Event poller loops: one per backing store, reacting to completion
//!   events within seconds
//! - Stranded scanner loop: periodic sweep that catches anything the
//!   event path missed

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod env;
mod lifecycle;
mod manager;
mod poller;
mod scanner;

use convoy_adapters::{BdEventFeed, BdIssueStore, CvDispatcher, PrefixRouter, TracedDispatch};
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};

use crate::config::ReconcileConfig;
use crate::lifecycle::{Config, LifecycleError};
use crate::manager::{ManagerDeps, ReconcileManager, Timing};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle info flags before any config/lock acquisition
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("convoyd {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("convoyd {}", env!("CARGO_PKG_VERSION"));
                println!("Convoy Daemon - keeps convoys fed and closed");
                println!();
                println!("USAGE:");
                println!("    convoyd");
                println!();
                println!("The daemon polls each backing store's event feed and sweeps");
                println!("for stranded convoys on an interval. Configuration is read");
                println!("from convoy.toml in the state directory.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: convoyd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    // Load configuration (user-level daemon)
    let config = Config::load()?;

    // Write startup marker to log (before tracing setup, so operators can find it)
    write_startup_marker(&config)?;

    // Set up logging
    let log_guard = setup_logging(&config)?;

    info!("Starting convoy daemon");

    let mut daemon = match lifecycle::startup(&config) {
        Ok(d) => d,
        Err(LifecycleError::LockFailed(_)) => {
            // Another daemon is already running — print a human-readable
            // message instead of a raw debug error.
            let pid = std::fs::read_to_string(&config.lock_path)
                .unwrap_or_default()
                .trim()
                .to_string();
            eprintln!("convoyd is already running");
            if !pid.is_empty() {
                eprintln!("  pid: {pid}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            write_startup_error(&config, &e);
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    let reconcile = match ReconcileConfig::load(&config.config_path) {
        Ok(r) => r,
        Err(e) => {
            let e = LifecycleError::from(e);
            write_startup_error(&config, &e);
            error!("Failed to start daemon: {}", e);
            let _ = daemon.shutdown();
            drop(log_guard);
            return Err(e.into());
        }
    };

    let town_root = match env::town_root().or_else(|| reconcile.town_root.clone()) {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    // Store databases, resolved against the town root. A store whose
    // directory is missing is skipped for event polling; the scanner
    // still covers its convoys.
    let mut store_dirs = std::collections::HashMap::new();
    let mut feeds = Vec::new();
    for (name, dir) in &reconcile.stores {
        let dir = if dir.is_absolute() {
            dir.clone()
        } else {
            town_root.join(dir)
        };
        if !dir.exists() {
            warn!(store = %name, dir = %dir.display(), "store directory missing, skipping event feed");
            continue;
        }
        store_dirs.insert(name.clone(), dir.clone());
        feeds.push((name.clone(), BdEventFeed::new(name.clone(), dir)));
    }

    let timing = Timing {
        scan_interval: env::scan_interval_ms().unwrap_or(reconcile.scan_interval),
        event_poll: env::event_poll_ms().unwrap_or(reconcile.event_poll),
    };

    let manager = ReconcileManager::new(
        ManagerDeps {
            store: BdIssueStore::new(town_root.clone(), store_dirs),
            dispatch: TracedDispatch::new(CvDispatcher::new(town_root.clone())),
            router: PrefixRouter::new(reconcile.rigs.clone()),
            feeds,
        },
        timing,
    );

    if let Err(e) = manager.start() {
        error!("Failed to start reconciliation: {}", e);
        let _ = daemon.shutdown();
        return Err(e.into());
    }

    // Set up signal handlers
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(town_root = %town_root.display(), "Daemon ready");

    // Signal ready for parent process (e.g., systemd, CLI waiting for startup)
    println!("READY");

    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down...");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down...");
        }
    }

    // Graceful shutdown: cancel both loops, then release the lock.
    manager.stop().await;
    daemon.shutdown()?;
    info!("Daemon stopped");
    Ok(())
}

/// Startup marker prefix written to log before anything else.
/// Full format: "--- convoyd: starting (pid: 12345) ---"
pub const STARTUP_MARKER_PREFIX: &str = "--- convoyd: starting (pid: ";

/// Write startup marker to log file (appends to existing log)
fn write_startup_marker(config: &Config) -> Result<(), LifecycleError> {
    use std::io::Write;

    // Create log directory if needed
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Append marker to log file with PID
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    writeln!(file, "{}{})", STARTUP_MARKER_PREFIX, std::process::id())?;

    Ok(())
}

/// Write startup error synchronously to log file.
/// This ensures the error is visible even if the process exits quickly.
fn write_startup_error(config: &Config, error: &LifecycleError) {
    use std::io::Write;

    let Ok(mut file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)
    else {
        return;
    };
    let _ = writeln!(file, "ERROR Failed to start daemon: {}", error);
}

fn setup_logging(
    config: &Config,
) -> Result<tracing_appender::non_blocking::WorkerGuard, LifecycleError> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    // Create log directory if needed
    if let Some(parent) = config.log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Set up file appender
    let file_appender = tracing_appender::rolling::never(
        config.log_path.parent().ok_or(LifecycleError::NoStateDir)?,
        config
            .log_path
            .file_name()
            .ok_or(LifecycleError::NoStateDir)?,
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // Set up subscriber with env filter
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking))
        .init();

    Ok(guard)
}
