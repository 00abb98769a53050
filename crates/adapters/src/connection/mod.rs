// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bot connection adapters
//!
//! A `ConnectionAdapter` owns the underlying game session for a bot. The
//! manager only ever talks to it through this trait:
//!
//! ```text
//! connect ──► handle (returned immediately)
//!               │
//!               └── background handshake ──► BotEvent::Connected / Error
//!                                              BotEvent::Log / Disconnected ...
//! ```
//!
//! Every event carries the generation from the `ConnectSpec`, so events from
//! a superseded attempt can be discarded by the receiver.

mod noop;
mod simulated;

pub use noop::NoOpConnectionAdapter;
pub use simulated::{SimulatedAdapter, SimulationConfig};

// Test support - only compiled for tests or when explicitly requested
#[cfg(any(test, feature = "test-support"))]
mod fake;
#[cfg(any(test, feature = "test-support"))]
pub use fake::{ConnectionCall, FakeConnectionAdapter};

use async_trait::async_trait;
use mcb_core::{AuthMode, BotEvent, BotId, BotRecord, Command, CommandReply, ServerAddress};
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors from connection operations
#[derive(Debug, Clone, Error)]
pub enum ConnectionError {
    #[error("session not found: {0}")]
    NotFound(String),
    #[error("connect failed: {0}")]
    ConnectFailed(String),
    #[error("session not ready: {0}")]
    NotReady(String),
    #[error("send failed: {0}")]
    SendFailed(String),
}

/// Everything an adapter needs to open a session for one attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectSpec {
    pub bot_id: BotId,
    /// Connection attempt this session belongs to
    pub generation: u64,
    pub username: String,
    pub server: ServerAddress,
    pub version: Option<String>,
    pub auth: AuthMode,
    pub anti_afk: bool,
}

impl ConnectSpec {
    pub fn from_record(record: &BotRecord, generation: u64) -> Self {
        Self {
            bot_id: record.id.clone(),
            generation,
            username: record.name.clone(),
            server: record.server.clone(),
            version: record.version.clone(),
            auth: record.auth,
            anti_afk: record.flags.anti_afk,
        }
    }
}

/// Handle to an open (or opening) session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionHandle {
    pub bot_id: BotId,
    pub generation: u64,
    /// Adapter-assigned session identifier
    pub session_id: String,
}

impl ConnectionHandle {
    pub fn new(bot_id: BotId, generation: u64, session_id: impl Into<String>) -> Self {
        Self {
            bot_id,
            generation,
            session_id: session_id.into(),
        }
    }
}

/// Adapter for opening and driving bot sessions
#[async_trait]
pub trait ConnectionAdapter: Clone + Send + Sync + 'static {
    /// Start opening a session.
    ///
    /// Returns as soon as the attempt is under way. Handshake completion or
    /// failure is reported on `event_tx` as `Connected` or `Error`; later
    /// session activity arrives as `Log` and `Disconnected`.
    async fn connect(
        &self,
        spec: ConnectSpec,
        event_tx: mpsc::Sender<BotEvent>,
    ) -> Result<ConnectionHandle, ConnectionError>;

    /// Dispatch a command to a connected session
    async fn send(
        &self,
        handle: &ConnectionHandle,
        command: &Command,
    ) -> Result<CommandReply, ConnectionError>;

    /// Close the session. No `Disconnected` event is emitted for a requested
    /// disconnect.
    async fn disconnect(&self, handle: &ConnectionHandle) -> Result<(), ConnectionError>;
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
