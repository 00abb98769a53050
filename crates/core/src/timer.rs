// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer identifier type for tracking scheduled timers.
//!
//! Timer ids embed the bot id and the connection generation they were
//! scheduled for, so a timer that outlives its connection attempt can be
//! recognised as stale when it fires.

use crate::bot::BotId;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

const RECONNECT_PREFIX: &str = "reconnect:";
const HANDSHAKE_PREFIX: &str = "handshake:";

/// Unique identifier for a timer instance.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerId(pub String);

/// What a fired timer asks the manager to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerKind {
    /// Attempt to reconnect the bot
    Reconnect { bot_id: BotId, generation: u64 },
    /// Give up on a handshake that never completed
    HandshakeTimeout { bot_id: BotId, generation: u64 },
}

impl TimerId {
    /// Create a new TimerId from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the string value of this TimerId.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Timer ID for a scheduled reconnect attempt.
    pub fn reconnect(bot_id: &BotId, generation: u64) -> Self {
        Self::new(format!("{RECONNECT_PREFIX}{generation}:{bot_id}"))
    }

    /// Timer ID for a connect handshake deadline.
    pub fn handshake(bot_id: &BotId, generation: u64) -> Self {
        Self::new(format!("{HANDSHAKE_PREFIX}{generation}:{bot_id}"))
    }

    /// Prefix shared by every timer belonging to `bot_id`, any generation.
    ///
    /// Bot ids are placed last so that ids containing `:` still parse.
    pub fn is_for(&self, bot_id: &BotId) -> bool {
        self.split().is_some_and(|(_, _, id)| id == bot_id.as_str())
    }

    /// Decode the timer back into the action it stands for.
    pub fn kind(&self) -> Option<TimerKind> {
        let (prefix, generation, id) = self.split()?;
        let bot_id = BotId::new(id);
        match prefix {
            RECONNECT_PREFIX => Some(TimerKind::Reconnect { bot_id, generation }),
            HANDSHAKE_PREFIX => Some(TimerKind::HandshakeTimeout { bot_id, generation }),
            _ => None,
        }
    }

    fn split(&self) -> Option<(&'static str, u64, &str)> {
        let (prefix, rest) = if let Some(rest) = self.0.strip_prefix(RECONNECT_PREFIX) {
            (RECONNECT_PREFIX, rest)
        } else if let Some(rest) = self.0.strip_prefix(HANDSHAKE_PREFIX) {
            (HANDSHAKE_PREFIX, rest)
        } else {
            return None;
        };
        let (generation, id) = rest.split_once(':')?;
        Some((prefix, generation.parse().ok()?, id))
    }
}

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TimerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<&str> for TimerId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Borrow<str> for TimerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[path = "timer_tests.rs"]
mod tests;
