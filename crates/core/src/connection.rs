// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live connection state machine.
//!
//! ```text
//! connecting ──► connected ──► disconnected (permanent stop, entry removed)
//!     ▲              │
//!     │              ▼
//!     └──────── reconnecting
//! ```
//!
//! Unexpected disconnects and handshake failures take the same
//! `reconnecting` edge as a non-permanent stop.

use crate::bot::{BotId, BotStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// State of a live connection held in the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    Connecting,
    Connected,
    Disconnected,
    Reconnecting,
}

impl ConnectionState {
    /// Whether the state machine allows moving from `self` to `next`
    pub fn can_transition_to(self, next: ConnectionState) -> bool {
        use ConnectionState::*;
        matches!(
            (self, next),
            (Connecting, Connected)
                | (Connecting, Reconnecting)
                | (Connecting, Disconnected)
                | (Connected, Reconnecting)
                | (Connected, Disconnected)
                | (Reconnecting, Connecting)
                | (Reconnecting, Disconnected)
        )
    }

    /// Status to persist when the registry enters this state
    pub fn as_status(self) -> BotStatus {
        match self {
            ConnectionState::Connecting => BotStatus::Connecting,
            ConnectionState::Connected => BotStatus::Online,
            ConnectionState::Disconnected => BotStatus::Offline,
            ConnectionState::Reconnecting => BotStatus::Reconnecting,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Reconnecting => "reconnecting",
        };
        f.write_str(s)
    }
}

/// Point-in-time view of one registry entry.
///
/// A bot that is not registered reports `running: false` and no state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub bot_id: BotId,
    pub running: bool,
    pub connected: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ConnectionState>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity_ms: Option<u64>,
    /// Consecutive failed reconnect attempts
    #[serde(default)]
    pub attempt: u32,
}

impl StatusSnapshot {
    pub fn not_running(bot_id: BotId) -> Self {
        Self {
            bot_id,
            running: false,
            connected: false,
            state: None,
            last_activity_ms: None,
            attempt: 0,
        }
    }
}

#[cfg(test)]
#[path = "connection_tests.rs"]
mod tests;
