// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Persisted bot configuration.
//!
//! A [`BotRecord`] is owned by the record store. The lifecycle manager reads
//! it to connect and writes back only the status fields (see
//! [`StatusUpdate`]).

use crate::owner::OwnerId;
use serde::{Deserialize, Serialize};
use std::fmt;

crate::define_id! {
    /// Unique identifier for a bot record.
    ///
    /// Live connections in the manager registry are keyed by the same id,
    /// which is also the name of the bot's relay room.
    pub struct BotId;
}

/// Default Minecraft server port
pub const DEFAULT_PORT: u16 = 25565;

/// Default delay between reconnect attempts
pub const DEFAULT_RECONNECT_DELAY_MS: u64 = 5_000;

/// Server the bot joins
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAddress {
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl ServerAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// How the bot authenticates with the server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Cracked/offline-mode servers: username only
    #[default]
    Offline,
    /// Online-mode servers: Microsoft account
    Microsoft,
}

/// Per-bot reconnect setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconnectSettings {
    pub enabled: bool,
    pub delay_ms: u64,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            delay_ms: DEFAULT_RECONNECT_DELAY_MS,
        }
    }
}

/// Behaviour toggles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotFlags {
    /// Periodically jump so the server does not kick the bot for idling
    #[serde(default)]
    pub anti_afk: bool,
    /// Relay chat and log lines to subscribers
    #[serde(default)]
    pub logging: bool,
}

/// Last status written back by the manager.
///
/// Storage may lag the registry; the registry is authoritative while the
/// daemon runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BotStatus {
    #[default]
    Offline,
    Connecting,
    Online,
    Reconnecting,
    Error,
}

impl fmt::Display for BotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BotStatus::Offline => "offline",
            BotStatus::Connecting => "connecting",
            BotStatus::Online => "online",
            BotStatus::Reconnecting => "reconnecting",
            BotStatus::Error => "error",
        };
        f.write_str(s)
    }
}

/// Persisted bot configuration and last known status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotRecord {
    pub id: BotId,
    pub owner: OwnerId,
    /// In-game username
    pub name: String,
    pub server: ServerAddress,
    /// Protocol version string (e.g. "1.20.4"); `None` lets the adapter negotiate
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub auth: AuthMode,
    #[serde(default)]
    pub reconnect: ReconnectSettings,
    #[serde(default)]
    pub flags: BotFlags,
    /// Whether the bot should be running; read by the boot sweep
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub status: BotStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_online_at_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
    #[serde(default)]
    pub updated_at_ms: u64,
}

impl BotRecord {
    /// New inactive record with default settings
    pub fn new(
        id: impl Into<BotId>,
        owner: impl Into<OwnerId>,
        name: impl Into<String>,
        server: ServerAddress,
    ) -> Self {
        Self {
            id: id.into(),
            owner: owner.into(),
            name: name.into(),
            server,
            version: None,
            auth: AuthMode::default(),
            reconnect: ReconnectSettings::default(),
            flags: BotFlags::default(),
            active: false,
            status: BotStatus::Offline,
            last_online_at_ms: None,
            last_error: None,
            updated_at_ms: 0,
        }
    }

    /// Apply a status write-back from the manager
    pub fn apply(&mut self, update: &StatusUpdate) {
        self.status = update.status;
        if let Some(active) = update.active {
            self.active = active;
        }
        if update.status == BotStatus::Online {
            self.last_online_at_ms = Some(update.at_ms);
            self.last_error = None;
        }
        if let Some(ref error) = update.error {
            self.last_error = Some(error.clone());
        }
        self.updated_at_ms = update.at_ms;
    }
}

/// Status fields the manager writes back to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: BotStatus,
    /// New persisted intent, if the transition changes it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub at_ms: u64,
}

impl StatusUpdate {
    pub fn new(status: BotStatus, at_ms: u64) -> Self {
        Self {
            status,
            active: None,
            error: None,
            at_ms,
        }
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

#[cfg(test)]
#[path = "bot_tests.rs"]
mod tests;
