// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake connection adapter for deterministic testing
#![cfg_attr(coverage_nightly, coverage(off))]

use super::{ConnectSpec, ConnectionAdapter, ConnectionError, ConnectionHandle};
use async_trait::async_trait;
use mcb_core::{BotEvent, BotId, Command, CommandReply};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Recorded call to FakeConnectionAdapter
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionCall {
    Connect { bot_id: BotId, generation: u64 },
    Send { bot_id: BotId, command: Command },
    Disconnect { bot_id: BotId, generation: u64 },
}

/// Fake connection adapter for testing
///
/// Handshakes never complete on their own; tests drive them with the
/// `emit_*` helpers. All calls are recorded.
#[derive(Clone)]
pub struct FakeConnectionAdapter {
    inner: Arc<Mutex<FakeConnectionState>>,
}

struct FakeConnectionState {
    sessions: HashMap<BotId, FakeSession>,
    calls: Vec<ConnectionCall>,
    next_session: u64,
    connect_error: Option<ConnectionError>,
    send_error: Option<ConnectionError>,
}

struct FakeSession {
    generation: u64,
    event_tx: mpsc::Sender<BotEvent>,
}

impl Default for FakeConnectionAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeConnectionAdapter {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(FakeConnectionState {
                sessions: HashMap::new(),
                calls: Vec::new(),
                next_session: 0,
                connect_error: None,
                send_error: None,
            })),
        }
    }

    /// Get all recorded calls
    pub fn calls(&self) -> Vec<ConnectionCall> {
        self.inner.lock().calls.clone()
    }

    /// Clear recorded calls
    pub fn clear_calls(&self) {
        self.inner.lock().calls.clear();
    }

    /// Number of connect calls made for a bot
    pub fn connect_count(&self, bot_id: &str) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, ConnectionCall::Connect { bot_id: id, .. } if id == bot_id))
            .count()
    }

    /// Number of send calls made for a bot
    pub fn send_count(&self, bot_id: &str) -> usize {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|c| matches!(c, ConnectionCall::Send { bot_id: id, .. } if id == bot_id))
            .count()
    }

    /// Generation of the most recent open session for a bot
    pub fn generation(&self, bot_id: &str) -> Option<u64> {
        self.inner.lock().sessions.get(bot_id).map(|s| s.generation)
    }

    /// Make the next connect call fail
    pub fn set_connect_error(&self, error: ConnectionError) {
        self.inner.lock().connect_error = Some(error);
    }

    /// Make the next send call fail
    pub fn set_send_error(&self, error: ConnectionError) {
        self.inner.lock().send_error = Some(error);
    }

    async fn emit(&self, bot_id: &str, make: impl FnOnce(BotId, u64) -> BotEvent) {
        let session = {
            let inner = self.inner.lock();
            inner
                .sessions
                .get(bot_id)
                .map(|s| (s.generation, s.event_tx.clone()))
        };
        if let Some((generation, tx)) = session {
            let _ = tx.send(make(BotId::new(bot_id), generation)).await;
        }
    }

    /// Complete the handshake of the bot's latest session
    pub async fn emit_connected(&self, bot_id: &str) {
        self.emit(bot_id, |bot_id, generation| BotEvent::Connected {
            bot_id,
            generation,
        })
        .await;
    }

    /// Drop the bot's latest session
    pub async fn emit_disconnected(&self, bot_id: &str, reason: &str) {
        let reason = reason.to_string();
        self.emit(bot_id, |bot_id, generation| BotEvent::Disconnected {
            bot_id,
            generation,
            reason,
        })
        .await;
    }

    /// Fail the bot's latest session
    pub async fn emit_error(&self, bot_id: &str, message: &str) {
        let message = message.to_string();
        self.emit(bot_id, |bot_id, generation| BotEvent::Error {
            bot_id,
            generation,
            message,
        })
        .await;
    }

    /// Emit a log line from the bot's latest session
    pub async fn emit_log(&self, bot_id: &str, line: &str) {
        let line = line.to_string();
        self.emit(bot_id, |bot_id, generation| BotEvent::Log {
            bot_id,
            generation,
            line,
        })
        .await;
    }
}

#[async_trait]
impl ConnectionAdapter for FakeConnectionAdapter {
    async fn connect(
        &self,
        spec: ConnectSpec,
        event_tx: mpsc::Sender<BotEvent>,
    ) -> Result<ConnectionHandle, ConnectionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ConnectionCall::Connect {
            bot_id: spec.bot_id.clone(),
            generation: spec.generation,
        });

        if let Some(error) = inner.connect_error.take() {
            return Err(error);
        }

        inner.next_session += 1;
        let session_id = format!("fake-{}", inner.next_session);
        inner.sessions.insert(
            spec.bot_id.clone(),
            FakeSession {
                generation: spec.generation,
                event_tx,
            },
        );

        Ok(ConnectionHandle::new(spec.bot_id, spec.generation, session_id))
    }

    async fn send(
        &self,
        handle: &ConnectionHandle,
        command: &Command,
    ) -> Result<CommandReply, ConnectionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ConnectionCall::Send {
            bot_id: handle.bot_id.clone(),
            command: command.clone(),
        });

        if let Some(error) = inner.send_error.take() {
            return Err(error);
        }
        if !inner.sessions.contains_key(&handle.bot_id) {
            return Err(ConnectionError::NotFound(handle.session_id.clone()));
        }

        Ok(CommandReply::new(format!("{} ok", command.name())))
    }

    async fn disconnect(&self, handle: &ConnectionHandle) -> Result<(), ConnectionError> {
        let mut inner = self.inner.lock();
        inner.calls.push(ConnectionCall::Disconnect {
            bot_id: handle.bot_id.clone(),
            generation: handle.generation,
        });

        let current = inner.sessions.get(&handle.bot_id).map(|s| s.generation);
        if current == Some(handle.generation) {
            inner.sessions.remove(&handle.bot_id);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
