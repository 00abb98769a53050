// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Boot sweep: restart every bot that was active when the daemon last ran.

use mcb_adapters::ConnectionAdapter;
use mcb_core::Clock;
use mcb_engine::BotManager;
use mcb_storage::BotStore;
use tracing::info;

/// Start all active bots, returning how many started successfully.
///
/// Runs after READY so clients can connect while bots come up.
pub(crate) async fn boot_sweep<A, S, C>(manager: &BotManager<A, S, C>) -> usize
where
    A: ConnectionAdapter,
    S: BotStore,
    C: Clock,
{
    let results = manager.start_active().await;
    let started = results.iter().filter(|(_, r)| r.success).count();
    info!(
        started,
        failed = results.len() - started,
        "boot sweep complete"
    );
    started
}
