// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! IPC Protocol for daemon communication.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload

use mcb_core::{BotEvent, BotId, BotRecord, OpResult, StatusSnapshot};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request from a client to the daemon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Request {
    /// Health check ping
    Ping,

    /// Start a stored bot
    Start { bot_id: BotId },

    /// Stop a running bot; `permanent` also clears its active flag
    Stop {
        bot_id: BotId,
        #[serde(default)]
        permanent: bool,
    },

    /// Force a fresh connection attempt
    Reconnect { bot_id: BotId },

    /// Create or replace a stored bot record
    Register { record: BotRecord },

    /// Disconnect a bot and delete its record
    Delete { bot_id: BotId },

    /// Send an in-game command to a connected bot
    Command {
        bot_id: BotId,
        name: String,
        #[serde(default)]
        params: Value,
    },

    /// Live status of one bot
    Status { bot_id: BotId },

    /// Live status of every running bot
    List,

    /// Stream a bot's events until the client hangs up
    Subscribe { bot_id: BotId },

    /// Request daemon shutdown
    Shutdown,
}

/// Response from daemon to client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum Response {
    Pong,

    /// Outcome of a lifecycle operation or command
    Result { result: OpResult },

    Status { status: StatusSnapshot },

    Statuses { bots: Vec<StatusSnapshot> },

    /// Subscription accepted; `Event` frames follow
    Subscribed { bot_id: BotId },

    Event { event: BotEvent },

    ShuttingDown,

    Error { message: String },
}

impl Response {
    pub fn error(message: impl Into<String>) -> Self {
        Response::Error {
            message: message.into(),
        }
    }
}

#[path = "protocol_wire.rs"]
mod wire;
pub use wire::{
    decode, encode, read_message, read_request, read_response, write_message, write_request,
    write_response, ProtocolError,
    DEFAULT_TIMEOUT, MAX_MESSAGE_SIZE, PROTOCOL_VERSION,
};

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
