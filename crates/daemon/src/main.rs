// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Minecraft bot daemon (mcbd)
//!
//! Background process that owns every bot connection.
//!
//! Architecture:
//! - Listener Task: Spawned task handling socket I/O, calls into the manager
//! - Engine Loop: Main task draining adapter events and firing timers

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

mod config;
mod env;
mod lifecycle;
mod listener;
mod logging;

use mcb_daemon::protocol;

use std::sync::Arc;

use mcb_core::Clock;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::Notify;
use tracing::{error, info};

use crate::config::Config;
use crate::lifecycle::{LifecycleError, StartupResult};
use crate::listener::{ListenCtx, Listener};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Handle info flags before any config/lock acquisition
    if let Some(arg) = std::env::args().nth(1) {
        match arg.as_str() {
            "--version" | "-V" | "-v" => {
                println!("mcbd {}", protocol::PROTOCOL_VERSION);
                return Ok(());
            }
            "--help" | "-h" | "help" => {
                println!("mcbd {}", protocol::PROTOCOL_VERSION);
                println!("Minecraft bot daemon - keeps bots connected and relays their events");
                println!();
                println!("USAGE:");
                println!("    mcbd");
                println!();
                println!("Listens on a Unix socket under the state directory");
                println!("($MCB_STATE_DIR, $XDG_STATE_HOME/mcb or ~/.local/state/mcb).");
                println!("Tuning is read from mcbd.toml in the same directory.");
                println!();
                println!("OPTIONS:");
                println!("    -h, --help       Print help information");
                println!("    -v, --version    Print version information");
                return Ok(());
            }
            _ => {
                eprintln!("error: unexpected argument '{arg}'");
                eprintln!("Usage: mcbd [--help | --version]");
                std::process::exit(1);
            }
        }
    }

    let config = Config::load()?;

    // Write startup marker to log (before tracing setup, so clients can find it)
    logging::write_startup_marker(&config)?;

    let log_guard = logging::setup_logging(&config)?;

    info!(settings = %config.settings_path.display(), "Starting bot daemon");

    let StartupResult {
        mut daemon,
        listener: unix_listener,
        mut event_rx,
    } = match lifecycle::startup(&config).await {
        Ok(r) => r,
        Err(LifecycleError::LockFailed(_)) => {
            let pid = std::fs::read_to_string(&config.lock_path)
                .unwrap_or_default()
                .trim()
                .to_string();

            eprintln!("mcbd is already running");
            if !pid.is_empty() {
                eprintln!("  pid: {pid}");
            }
            std::process::exit(1);
        }
        Err(e) => {
            // Write error synchronously (tracing is non-blocking and may not flush in time)
            logging::write_startup_error(&config, &e);
            error!("Failed to start daemon: {}", e);
            drop(log_guard);
            return Err(e.into());
        }
    };

    let shutdown_notify = Arc::new(Notify::new());

    let listener = Listener::new(
        unix_listener,
        ListenCtx {
            manager: Arc::clone(&daemon.manager),
            shutdown: Arc::clone(&shutdown_notify),
        },
    );
    tokio::spawn(listener.run());

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    info!(
        "Daemon ready, listening on {}",
        config.socket_path.display()
    );

    // Signal ready for parent process (e.g., systemd, a client waiting for startup)
    println!("READY");

    // Boot sweep runs in the background; the daemon is already accepting connections
    let sweep_manager = Arc::clone(&daemon.manager);
    tokio::spawn(async move {
        lifecycle::boot_sweep(&sweep_manager).await;
    });

    // NOTE: Must be created outside the loop - tokio::select! re-evaluates
    // branches on each iteration, so using sleep() inside would reset on
    // every event, causing timers to never fire during activity.
    let mut timer_check = tokio::time::interval(config.tick_interval);

    loop {
        tokio::select! {
            event = event_rx.recv() => {
                match event {
                    Some(event) => daemon.manager.handle_event(event).await,
                    None => {
                        info!("Event channel closed, shutting down...");
                        break;
                    }
                }
            }

            _ = shutdown_notify.notified() => {
                info!("Shutdown requested via command");
                break;
            }

            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down...");
                break;
            }

            _ = sigint.recv() => {
                info!("Received SIGINT, shutting down...");
                break;
            }

            _ = timer_check.tick() => {
                let now = daemon.manager.clock().now();
                daemon.manager.tick(now).await;
            }
        }
    }

    daemon.shutdown().await?;
    info!("Daemon stopped");
    Ok(())
}
