// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Commands a client can send to a connected bot.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Maximum chat message length accepted by vanilla servers
pub const MAX_CHAT_LEN: usize = 256;

/// Default duration for a move command
pub const DEFAULT_MOVE_MS: u64 = 1_000;

/// Upper bound for a single move command
pub const MAX_MOVE_MS: u64 = 10_000;

/// Errors from command parsing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),
    #[error("invalid params for {command}: {reason}")]
    InvalidParams {
        command: &'static str,
        reason: String,
    },
}

/// Direction for a move command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Back,
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::Forward => "forward",
            Direction::Back => "back",
            Direction::Left => "left",
            Direction::Right => "right",
        };
        f.write_str(s)
    }
}

/// A validated bot command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    /// Send a chat message (`chat` or `say`)
    Chat { message: String },
    /// Walk in a direction for a while
    Move { direction: Direction, duration_ms: u64 },
    Jump,
    /// Report position, health and food
    Status,
}

impl Command {
    /// Parse a command name and its JSON params.
    ///
    /// `chat` accepts either `{"message": "..."}` or a bare string.
    pub fn parse(name: &str, params: &Value) -> Result<Self, CommandError> {
        match name {
            "chat" | "say" => parse_chat(params),
            "move" => parse_move(params),
            "jump" => Ok(Command::Jump),
            "status" => Ok(Command::Status),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Command::Chat { .. } => "chat",
            Command::Move { .. } => "move",
            Command::Jump => "jump",
            Command::Status => "status",
        }
    }
}

fn parse_chat(params: &Value) -> Result<Command, CommandError> {
    let message = match params {
        Value::String(s) => s.as_str(),
        Value::Object(map) => map.get("message").and_then(Value::as_str).unwrap_or(""),
        _ => "",
    };
    let message = message.trim();
    if message.is_empty() {
        return Err(CommandError::InvalidParams {
            command: "chat",
            reason: "message is required".to_string(),
        });
    }
    if message.chars().count() > MAX_CHAT_LEN {
        return Err(CommandError::InvalidParams {
            command: "chat",
            reason: format!("message longer than {MAX_CHAT_LEN} characters"),
        });
    }
    Ok(Command::Chat {
        message: message.to_string(),
    })
}

fn parse_move(params: &Value) -> Result<Command, CommandError> {
    let invalid = |reason: String| CommandError::InvalidParams {
        command: "move",
        reason,
    };

    let direction = params
        .get("direction")
        .cloned()
        .ok_or_else(|| invalid("direction is required".to_string()))?;
    let direction: Direction =
        serde_json::from_value(direction).map_err(|e| invalid(format!("direction: {e}")))?;

    let duration_ms = match params.get("duration_ms") {
        None | Some(Value::Null) => DEFAULT_MOVE_MS,
        Some(v) => v
            .as_u64()
            .ok_or_else(|| invalid("duration_ms must be a positive integer".to_string()))?,
    };
    if duration_ms == 0 || duration_ms > MAX_MOVE_MS {
        return Err(invalid(format!(
            "duration_ms must be between 1 and {MAX_MOVE_MS}"
        )));
    }

    Ok(Command::Move {
        direction,
        duration_ms,
    })
}

/// Reply from the connection for a dispatched command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandReply {
    pub message: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
}

impl CommandReply {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            data: Value::Null,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = data;
        self
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
