// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Adapter event handling, timers and the failure path

use super::BotManager;
use mcb_adapters::{ConnectionAdapter, ConnectionHandle};
use mcb_core::{
    BotEvent, BotId, BotStatus, Clock, ConnectionState, StatusUpdate, TimerId, TimerKind,
};
use mcb_storage::BotStore;
use std::time::{Duration, Instant};

/// Why a connection attempt or session ended
#[derive(Debug, Clone)]
pub(super) enum FailureCause {
    /// Session closed by the server or network
    Disconnected(String),
    /// Connect error, handshake timeout or session error
    Error(String),
}

impl FailureCause {
    fn reason(&self) -> &str {
        match self {
            FailureCause::Disconnected(r) | FailureCause::Error(r) => r,
        }
    }
}

/// What the failure path decided under the lock
enum FailureOutcome {
    Retry {
        handle: Option<ConnectionHandle>,
        attempt: u32,
        delay: Duration,
    },
    Dropped {
        handle: Option<ConnectionHandle>,
        attempts: u32,
        /// Retry policy ran out, as opposed to reconnect being disabled
        exhausted: bool,
    },
}

impl<A, S, C> BotManager<A, S, C>
where
    A: ConnectionAdapter,
    S: BotStore,
    C: Clock,
{
    /// Apply an event emitted by the connection adapter.
    ///
    /// Events whose generation no longer matches the registry entry are
    /// dropped.
    pub async fn handle_event(&self, event: BotEvent) {
        let Some(generation) = event.generation() else {
            self.publish(event);
            return;
        };
        let bot_id = event.bot_id().clone();
        let now_ms = self.clock.epoch_ms();

        match event {
            BotEvent::Connected { .. } => {
                let connected = match self.registry.lock().current_mut(&bot_id, generation) {
                    Some(entry) if entry.state == ConnectionState::Connecting => {
                        entry.set_state(ConnectionState::Connected);
                        entry.attempt = 0;
                        entry.last_activity_ms = now_ms;
                        true
                    }
                    _ => false,
                };
                if !connected {
                    tracing::debug!(%bot_id, generation, "ignoring stale connect");
                    return;
                }

                self.scheduler
                    .lock()
                    .cancel_timer(&TimerId::handshake(&bot_id, generation));
                tracing::info!(%bot_id, generation, "bot connected");
                self.persist(
                    &bot_id,
                    StatusUpdate::new(ConnectionState::Connected.as_status(), now_ms),
                )
                .await;
                self.publish(event);
            }
            BotEvent::Log { .. } => {
                let logging = self
                    .registry
                    .lock()
                    .current_mut(&bot_id, generation)
                    .map(|entry| {
                        entry.last_activity_ms = now_ms;
                        entry.record.flags.logging
                    });
                match logging {
                    Some(true) => self.publish(event),
                    Some(false) => {}
                    None => tracing::trace!(%bot_id, generation, "ignoring stale log"),
                }
            }
            BotEvent::Disconnected { ref reason, .. } => {
                let cause = FailureCause::Disconnected(reason.clone());
                self.relay_failure(event, &bot_id, generation, cause).await;
            }
            BotEvent::Error { ref message, .. } => {
                let cause = FailureCause::Error(message.clone());
                self.relay_failure(event, &bot_id, generation, cause).await;
            }
            BotEvent::Reconnecting { .. } | BotEvent::GaveUp { .. } => self.publish(event),
        }
    }

    async fn relay_failure(
        &self,
        event: BotEvent,
        bot_id: &BotId,
        generation: u64,
        cause: FailureCause,
    ) {
        let current = self
            .registry
            .lock()
            .get(bot_id)
            .is_some_and(|entry| entry.generation == generation);
        if !current {
            tracing::debug!(%bot_id, generation, event = event.name(), "ignoring stale event");
            return;
        }
        tracing::warn!(%bot_id, generation, reason = cause.reason(), "bot connection lost");
        self.publish(event);
        self.fail(bot_id, generation, cause).await;
    }

    /// Fire every timer due at `now`
    pub async fn tick(&self, now: Instant) {
        let fired = self.scheduler.lock().fired_timers(now);
        for id in fired {
            match id.kind() {
                Some(TimerKind::Reconnect { bot_id, generation }) => {
                    let result = self.reconnect_entry(&bot_id, Some(generation)).await;
                    if !result.success {
                        tracing::warn!(%bot_id, message = %result.message, "scheduled reconnect failed");
                    }
                }
                Some(TimerKind::HandshakeTimeout { bot_id, generation }) => {
                    self.handshake_timeout(&bot_id, generation).await;
                }
                None => tracing::warn!(timer = %id, "unknown timer fired"),
            }
        }
    }

    async fn handshake_timeout(&self, bot_id: &BotId, generation: u64) {
        let waiting = self
            .registry
            .lock()
            .get(bot_id)
            .is_some_and(|e| e.generation == generation && e.state == ConnectionState::Connecting);
        if !waiting {
            return;
        }

        let message = format!(
            "handshake timed out after {}ms",
            self.config.connect_timeout.as_millis()
        );
        tracing::warn!(%bot_id, generation, "{message}");
        self.publish(BotEvent::Error {
            bot_id: bot_id.clone(),
            generation,
            message: message.clone(),
        });
        self.fail(bot_id, generation, FailureCause::Error(message)).await;
    }

    /// Failure path shared by connect errors, handshake timeouts and lost
    /// sessions.
    ///
    /// Schedules the next reconnect attempt if the bot allows it and the
    /// retry policy is not exhausted; otherwise drops the bot from the
    /// registry.
    pub(super) async fn fail(&self, bot_id: &BotId, generation: u64, cause: FailureCause) {
        let now = self.clock.now();
        let now_ms = self.clock.epoch_ms();

        let outcome = {
            let mut registry = self.registry.lock();
            let Some(entry) = registry.current_mut(bot_id, generation) else {
                return;
            };
            if !matches!(
                entry.state,
                ConnectionState::Connecting | ConnectionState::Connected
            ) {
                return;
            }

            let handle = entry.handle.take();
            let attempt = entry.attempt + 1;
            let delay = if entry.record.reconnect.enabled {
                self.policy_for(&entry.record).delay_for(attempt)
            } else {
                None
            };
            let exhausted = entry.record.reconnect.enabled;

            match delay {
                Some(delay) => {
                    let next = registry.next_generation();
                    if let Some(entry) = registry.get_mut(bot_id) {
                        entry.set_state(ConnectionState::Reconnecting);
                        entry.generation = next;
                        entry.attempt = attempt;
                    }
                    let mut scheduler = self.scheduler.lock();
                    scheduler.cancel_bot_timers(bot_id);
                    scheduler.set_timer(TimerId::reconnect(bot_id, next), delay, now);
                    FailureOutcome::Retry {
                        handle,
                        attempt,
                        delay,
                    }
                }
                None => {
                    registry.remove(bot_id);
                    self.scheduler.lock().cancel_bot_timers(bot_id);
                    FailureOutcome::Dropped {
                        handle,
                        attempts: attempt - 1,
                        exhausted,
                    }
                }
            }
        };

        match outcome {
            FailureOutcome::Retry {
                handle,
                attempt,
                delay,
            } => {
                self.close(handle).await;
                let delay_ms = delay.as_millis() as u64;
                tracing::info!(%bot_id, attempt, delay_ms, "reconnect scheduled");
                self.persist(
                    bot_id,
                    StatusUpdate::new(ConnectionState::Reconnecting.as_status(), now_ms)
                        .error(cause.reason()),
                )
                .await;
                self.publish(BotEvent::Reconnecting {
                    bot_id: bot_id.clone(),
                    attempt,
                    delay_ms,
                });
            }
            FailureOutcome::Dropped {
                handle,
                attempts,
                exhausted,
            } => {
                self.close(handle).await;
                let update = match (&cause, exhausted) {
                    (FailureCause::Disconnected(_), false) => {
                        StatusUpdate::new(BotStatus::Offline, now_ms)
                    }
                    _ => StatusUpdate::new(BotStatus::Error, now_ms).error(cause.reason()),
                };
                self.persist(bot_id, update).await;
                if exhausted {
                    tracing::warn!(%bot_id, attempts, "retry policy exhausted, giving up");
                    self.publish(BotEvent::GaveUp {
                        bot_id: bot_id.clone(),
                        attempts,
                    });
                } else {
                    tracing::info!(%bot_id, "reconnect disabled, bot dropped");
                }
            }
        }
    }
}
