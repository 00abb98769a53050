// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Start, stop, reconnect and teardown operations

use super::events::FailureCause;
use super::BotManager;
use mcb_adapters::{ConnectSpec, ConnectionAdapter, ConnectionError, ConnectionHandle};
use mcb_core::{
    BotEvent, BotId, BotRecord, BotStatus, Clock, ConnectionState, ErrorKind, OpResult,
    StatusUpdate, TimerId,
};
use mcb_storage::{BotFilter, BotStore};
use std::time::Duration;

impl<A, S, C> BotManager<A, S, C>
where
    A: ConnectionAdapter,
    S: BotStore,
    C: Clock,
{
    /// Start a bot.
    ///
    /// The handshake completes in the background; `status` reports
    /// `connected` once the adapter emits `Connected`.
    pub async fn start(&self, bot_id: &BotId) -> OpResult {
        if self.registry.lock().contains(bot_id) {
            return OpResult::ok("Bot is already running");
        }

        let record = match self.store.find_by_id(bot_id).await {
            Ok(Some(record)) => record,
            Ok(None) => return OpResult::not_found(),
            Err(e) => {
                tracing::error!(%bot_id, error = %e, "failed to load bot record");
                return OpResult::fail(ErrorKind::Underlying, format!("Failed to load bot: {e}"));
            }
        };

        let now_ms = self.clock.epoch_ms();
        // Re-checked under the lock: a concurrent start may have won the race
        // while the record was loading.
        let Some(generation) = self
            .registry
            .lock()
            .insert_connecting(record.clone(), now_ms)
        else {
            return OpResult::ok("Bot is already running");
        };

        tracing::info!(%bot_id, generation, server = %record.server, "starting bot");
        self.persist(
            bot_id,
            StatusUpdate::new(ConnectionState::Connecting.as_status(), now_ms).active(true),
        )
        .await;

        // A permanent stop that ran during the write above has already
        // cleared `active`; restore its outcome and skip the connect.
        if !self.registry.lock().contains(bot_id) {
            tracing::info!(%bot_id, generation, "bot stopped while starting");
            self.persist(
                bot_id,
                StatusUpdate::new(BotStatus::Offline, self.clock.epoch_ms()).active(false),
            )
            .await;
            return OpResult::fail(ErrorKind::NotRunning, "Bot was stopped while starting");
        }

        match self.open(record, generation).await {
            Ok(()) => OpResult::ok("Bot is starting"),
            Err(e) => OpResult::fail(ErrorKind::Underlying, format!("Failed to start bot: {e}")),
        }
    }

    /// Stop a bot.
    ///
    /// A permanent stop removes the bot from the registry and clears its
    /// `active` flag. Otherwise the bot is disconnected and a reconnect is
    /// scheduled after the bot's base delay.
    pub async fn stop(&self, bot_id: &BotId, permanent: bool) -> OpResult {
        let now = self.clock.now();
        let now_ms = self.clock.epoch_ms();

        let (handle, generation, delay) = {
            let mut registry = self.registry.lock();
            let Some(entry) = registry.get(bot_id) else {
                return OpResult::not_running();
            };
            let policy = self.policy_for(&entry.record);
            let base = Duration::from_millis(entry.record.reconnect.delay_ms);

            if permanent {
                let Some(entry) = registry.remove(bot_id) else {
                    return OpResult::not_running();
                };
                self.scheduler.lock().cancel_bot_timers(bot_id);
                (entry.handle, entry.generation, None)
            } else {
                let next = registry.next_generation();
                let Some(entry) = registry.get_mut(bot_id) else {
                    return OpResult::not_running();
                };
                let delay = policy.delay_for(1).unwrap_or(base);
                let handle = entry.handle.take();
                entry.set_state(ConnectionState::Reconnecting);
                entry.generation = next;
                entry.attempt = 0;

                let mut scheduler = self.scheduler.lock();
                scheduler.cancel_bot_timers(bot_id);
                scheduler.set_timer(TimerId::reconnect(bot_id, next), delay, now);
                (handle, next, Some(delay))
            }
        };

        self.close(handle).await;

        match delay {
            None => {
                tracing::info!(%bot_id, generation, "bot stopped");
                self.persist(
                    bot_id,
                    StatusUpdate::new(BotStatus::Offline, now_ms).active(false),
                )
                .await;
                self.publish(BotEvent::Disconnected {
                    bot_id: bot_id.clone(),
                    generation,
                    reason: "stopped".to_string(),
                });
                OpResult::ok("Bot stopped")
            }
            Some(delay) => {
                let delay_ms = delay.as_millis() as u64;
                tracing::info!(%bot_id, generation, delay_ms, "bot disconnected, reconnect scheduled");
                self.persist(
                    bot_id,
                    StatusUpdate::new(ConnectionState::Reconnecting.as_status(), now_ms),
                )
                .await;
                self.publish(BotEvent::Reconnecting {
                    bot_id: bot_id.clone(),
                    attempt: 0,
                    delay_ms,
                });
                OpResult::ok(format!("Bot will reconnect in {delay_ms}ms"))
            }
        }
    }

    /// Reconnect a running bot now, replacing any pending reconnect timer
    pub async fn reconnect(&self, bot_id: &BotId) -> OpResult {
        self.reconnect_entry(bot_id, None).await
    }

    /// Re-run the connect sequence for a registered bot.
    ///
    /// With `expected` set (timer path) the entry must still be waiting on
    /// that generation, otherwise the call is a no-op.
    pub(super) async fn reconnect_entry(&self, bot_id: &BotId, expected: Option<u64>) -> OpResult {
        let now_ms = self.clock.epoch_ms();

        let (old_handle, record, generation, attempt) = {
            let mut registry = self.registry.lock();
            let Some(entry) = registry.get(bot_id) else {
                return OpResult::not_running();
            };
            if let Some(expected) = expected {
                if entry.generation != expected || entry.state != ConnectionState::Reconnecting {
                    tracing::debug!(%bot_id, expected, current = entry.generation, "stale reconnect timer");
                    return OpResult::ok("Stale reconnect ignored");
                }
            }

            let next = registry.next_generation();
            let Some(entry) = registry.get_mut(bot_id) else {
                return OpResult::not_running();
            };
            let old_handle = entry.handle.take();
            entry.set_state(ConnectionState::Connecting);
            entry.generation = next;
            entry.last_activity_ms = now_ms;
            self.scheduler.lock().cancel_bot_timers(bot_id);
            (old_handle, entry.record.clone(), next, entry.attempt)
        };

        self.close(old_handle).await;

        tracing::info!(%bot_id, generation, attempt, "reconnecting bot");
        self.persist(
            bot_id,
            StatusUpdate::new(ConnectionState::Connecting.as_status(), now_ms),
        )
        .await;

        match self.open(record, generation).await {
            Ok(()) => OpResult::ok("Bot is reconnecting"),
            Err(e) => OpResult::fail(
                ErrorKind::Underlying,
                format!("Failed to reconnect bot: {e}"),
            ),
        }
    }

    /// Drop a bot whose record is being deleted.
    ///
    /// Same as a permanent stop, without writing to the store.
    pub async fn remove(&self, bot_id: &BotId) -> OpResult {
        let entry = {
            let mut registry = self.registry.lock();
            let entry = registry.remove(bot_id);
            if entry.is_some() {
                self.scheduler.lock().cancel_bot_timers(bot_id);
            }
            entry
        };
        let Some(entry) = entry else {
            return OpResult::not_running();
        };

        self.close(entry.handle).await;
        tracing::info!(%bot_id, "bot removed");
        self.publish(BotEvent::Disconnected {
            bot_id: bot_id.clone(),
            generation: entry.generation,
            reason: "deleted".to_string(),
        });
        OpResult::ok("Bot removed")
    }

    /// Start every record marked `active`.
    ///
    /// Runs once at boot. Until it finishes, persisted status may not
    /// reflect what is actually running.
    pub async fn start_active(&self) -> Vec<(BotId, OpResult)> {
        let records = match self.store.find(&BotFilter::active()).await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "boot sweep could not list active bots");
                return Vec::new();
            }
        };

        tracing::info!(count = records.len(), "starting active bots");
        let mut results = Vec::with_capacity(records.len());
        for record in records {
            let result = self.start(&record.id).await;
            if !result.success {
                tracing::warn!(bot_id = %record.id, message = %result.message, "boot start failed");
            }
            results.push((record.id, result));
        }
        results
    }

    /// Disconnect every bot for process shutdown.
    ///
    /// `active` is left untouched so the next boot sweep restores the same
    /// set of bots.
    pub async fn shutdown(&self) {
        let entries = {
            let mut registry = self.registry.lock();
            let entries = registry.drain();
            let mut scheduler = self.scheduler.lock();
            for entry in &entries {
                scheduler.cancel_bot_timers(&entry.record.id);
            }
            entries
        };

        tracing::info!(count = entries.len(), "disconnecting all bots");
        let now_ms = self.clock.epoch_ms();
        for entry in entries {
            self.close(entry.handle).await;
            self.persist(&entry.record.id, StatusUpdate::new(BotStatus::Offline, now_ms))
                .await;
        }
    }

    /// Ask the adapter to open a session for `generation`.
    ///
    /// A connect error is routed through the failure path before being
    /// returned.
    pub(super) async fn open(
        &self,
        record: BotRecord,
        generation: u64,
    ) -> Result<(), ConnectionError> {
        let bot_id = record.id.clone();
        self.scheduler.lock().set_timer(
            TimerId::handshake(&bot_id, generation),
            self.config.connect_timeout,
            self.clock.now(),
        );

        let spec = ConnectSpec::from_record(&record, generation);
        match self.adapter.connect(spec, self.event_tx.clone()).await {
            Ok(handle) => {
                // The bot may have been stopped while the connect call was
                // in flight; that session must not outlive it.
                let orphan = match self.registry.lock().current_mut(&bot_id, generation) {
                    Some(entry) => {
                        entry.handle = Some(handle);
                        None
                    }
                    None => Some(handle),
                };
                if orphan.is_some() {
                    tracing::debug!(%bot_id, generation, "closing session opened for a stale attempt");
                    self.close(orphan).await;
                }
                Ok(())
            }
            Err(e) => {
                tracing::warn!(%bot_id, generation, error = %e, "connect failed");
                self.publish(BotEvent::Error {
                    bot_id: bot_id.clone(),
                    generation,
                    message: e.to_string(),
                });
                self.fail(&bot_id, generation, FailureCause::Error(e.to_string()))
                    .await;
                Err(e)
            }
        }
    }

    /// Disconnect a session handle, if any. Errors are logged only.
    pub(super) async fn close(&self, handle: Option<ConnectionHandle>) {
        let Some(handle) = handle else {
            return;
        };
        if let Err(e) = self.adapter.disconnect(&handle).await {
            tracing::debug!(bot_id = %handle.bot_id, error = %e, "disconnect failed");
        }
    }
}
