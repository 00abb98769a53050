// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bot lifecycle events.
//!
//! Adapters emit the connection-level variants (`bot:connected`,
//! `bot:disconnected`, `bot:log`, `bot:error`) tagged with the generation of
//! the connection attempt that produced them. The manager adds the
//! scheduling variants and relays everything to the bot's room.

use crate::bot::BotId;
use serde::{Deserialize, Serialize};

/// Events that drive and describe bot state transitions.
///
/// Serializes with `{"type": "bot:name", ...fields}` format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BotEvent {
    // -- adapter --
    /// Handshake completed; the bot is in the world
    #[serde(rename = "bot:connected")]
    Connected { bot_id: BotId, generation: u64 },

    /// Session ended (kicked, network drop, or requested disconnect)
    #[serde(rename = "bot:disconnected")]
    Disconnected {
        bot_id: BotId,
        generation: u64,
        reason: String,
    },

    /// Chat or activity line produced by the bot
    #[serde(rename = "bot:log")]
    Log {
        bot_id: BotId,
        generation: u64,
        line: String,
    },

    /// Underlying connection error
    #[serde(rename = "bot:error")]
    Error {
        bot_id: BotId,
        generation: u64,
        message: String,
    },

    // -- manager --
    /// A reconnect attempt has been scheduled
    #[serde(rename = "bot:reconnecting")]
    Reconnecting {
        bot_id: BotId,
        attempt: u32,
        delay_ms: u64,
    },

    /// Retry policy exhausted; the bot was dropped from the registry
    #[serde(rename = "bot:gave_up")]
    GaveUp { bot_id: BotId, attempts: u32 },
}

impl BotEvent {
    pub fn bot_id(&self) -> &BotId {
        match self {
            BotEvent::Connected { bot_id, .. }
            | BotEvent::Disconnected { bot_id, .. }
            | BotEvent::Log { bot_id, .. }
            | BotEvent::Error { bot_id, .. }
            | BotEvent::Reconnecting { bot_id, .. }
            | BotEvent::GaveUp { bot_id, .. } => bot_id,
        }
    }

    /// Connection generation for adapter events, `None` for manager events
    pub fn generation(&self) -> Option<u64> {
        match self {
            BotEvent::Connected { generation, .. }
            | BotEvent::Disconnected { generation, .. }
            | BotEvent::Log { generation, .. }
            | BotEvent::Error { generation, .. } => Some(*generation),
            BotEvent::Reconnecting { .. } | BotEvent::GaveUp { .. } => None,
        }
    }

    /// Short channel name used by subscribers (`connect`, `log`, ...)
    pub fn name(&self) -> &'static str {
        match self {
            BotEvent::Connected { .. } => "connect",
            BotEvent::Disconnected { .. } => "disconnect",
            BotEvent::Log { .. } => "log",
            BotEvent::Error { .. } => "error",
            BotEvent::Reconnecting { .. } => "reconnecting",
            BotEvent::GaveUp { .. } => "gave_up",
        }
    }

    /// One-line summary for the daemon log
    pub fn log_summary(&self) -> String {
        let t = self.name();
        match self {
            BotEvent::Connected { bot_id, generation } => {
                format!("{t} bot={bot_id} gen={generation}")
            }
            BotEvent::Disconnected {
                bot_id,
                generation,
                reason,
            } => format!("{t} bot={bot_id} gen={generation} reason={reason}"),
            BotEvent::Log {
                bot_id,
                generation,
                line,
            } => format!("{t} bot={bot_id} gen={generation} len={}", line.len()),
            BotEvent::Error {
                bot_id,
                generation,
                message,
            } => format!("{t} bot={bot_id} gen={generation} error={message}"),
            BotEvent::Reconnecting {
                bot_id,
                attempt,
                delay_ms,
            } => format!("{t} bot={bot_id} attempt={attempt} delay_ms={delay_ms}"),
            BotEvent::GaveUp { bot_id, attempts } => {
                format!("{t} bot={bot_id} attempts={attempts}")
            }
        }
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
