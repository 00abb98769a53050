// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bot lifecycle manager.
//!
//! Owns the live connection registry and the reconnect scheduler, and is
//! the only component that talks to the connection adapter. Operations
//! never return errors: every outcome is an [`OpResult`](mcb_core::OpResult).
//!
//! Locks are short and never held across `.await`. When both are needed
//! the registry lock is taken before the scheduler lock.

mod commands;
mod events;
mod lifecycle;

use crate::registry::Registry;
use crate::relay::EventRelay;
use crate::scheduler::Scheduler;
use mcb_adapters::ConnectionAdapter;
use mcb_core::{BotEvent, BotId, BotRecord, Clock, RetryPolicy, StatusSnapshot, StatusUpdate};
use mcb_storage::BotStore;
use parking_lot::Mutex;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, mpsc};

/// Default time allowed for a handshake before the attempt counts as failed
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Manager tuning
#[derive(Debug, Clone)]
pub struct ManagerConfig {
    /// Daemon-wide retry policy; a bot's own reconnect delay replaces its base
    pub retry: RetryPolicy,
    pub connect_timeout: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

/// Manager adapter dependencies
pub struct ManagerDeps<A, S> {
    pub adapter: A,
    pub store: S,
}

/// Lifecycle manager for every bot this process runs
pub struct BotManager<A, S, C: Clock> {
    adapter: A,
    store: S,
    clock: C,
    config: ManagerConfig,
    registry: Mutex<Registry>,
    scheduler: Mutex<Scheduler>,
    relay: EventRelay,
    /// Handed to the adapter on every connect; the daemon loop drains the
    /// other end into [`BotManager::handle_event`]
    event_tx: mpsc::Sender<BotEvent>,
}

impl<A, S, C> BotManager<A, S, C>
where
    A: ConnectionAdapter,
    S: BotStore,
    C: Clock,
{
    pub fn new(
        deps: ManagerDeps<A, S>,
        clock: C,
        config: ManagerConfig,
        event_tx: mpsc::Sender<BotEvent>,
    ) -> Self {
        Self {
            adapter: deps.adapter,
            store: deps.store,
            clock,
            config,
            registry: Mutex::new(Registry::new()),
            scheduler: Mutex::new(Scheduler::new()),
            relay: EventRelay::new(),
            event_tx,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn config(&self) -> &ManagerConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Snapshot of one bot; unregistered bots report `running: false`
    pub fn status(&self, bot_id: &BotId) -> StatusSnapshot {
        self.registry
            .lock()
            .get(bot_id)
            .map(|entry| entry.snapshot())
            .unwrap_or_else(|| StatusSnapshot::not_running(bot_id.clone()))
    }

    /// Snapshots of every running bot, ordered by id
    pub fn statuses(&self) -> Vec<StatusSnapshot> {
        self.registry.lock().snapshots()
    }

    /// Join a bot's relay room
    pub fn subscribe(&self, bot_id: &BotId) -> broadcast::Receiver<BotEvent> {
        self.relay.subscribe(bot_id)
    }

    /// Leave a relay room, discarding it if no subscribers remain
    pub fn unsubscribe(&self, events: broadcast::Receiver<BotEvent>) {
        drop(events);
        self.relay.prune();
    }

    /// Number of relay rooms that still have subscribers
    pub fn relay_rooms(&self) -> usize {
        self.relay.room_count()
    }

    /// Earliest pending timer deadline
    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.lock().next_deadline()
    }

    /// Retry policy for one bot
    fn policy_for(&self, record: &BotRecord) -> RetryPolicy {
        match record.reconnect.delay_ms {
            0 => self.config.retry,
            ms => self.config.retry.with_base_delay(Duration::from_millis(ms)),
        }
    }

    /// Write a status change back to the store. Failures are logged only.
    async fn persist(&self, bot_id: &BotId, update: StatusUpdate) {
        let status = update.status;
        if let Err(e) = self.store.update_status(bot_id, update).await {
            tracing::warn!(%bot_id, %status, error = %e, "failed to persist bot status");
        }
    }

    fn publish(&self, event: BotEvent) {
        let delivered = self.relay.publish(event);
        tracing::trace!(delivered, "relayed");
    }
}

#[cfg(test)]
#[path = "../manager_tests/mod.rs"]
mod tests;
