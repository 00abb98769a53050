// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared test helpers for use across crates.
//!
//! Gated behind `#[cfg(any(test, feature = "test-support"))]`.

use crate::{BotEvent, BotFlags, BotId, BotRecord, ServerAddress};

// ── Record factories ────────────────────────────────────────────────────────

/// Record pointing at a local test server with reconnect enabled
pub fn bot_record(id: &str) -> BotRecord {
    BotRecord::new(id, "owner-1", format!("{id}-name"), ServerAddress::new("127.0.0.1", 25565))
}

/// Record that the boot sweep should pick up
pub fn active_record(id: &str) -> BotRecord {
    let mut record = bot_record(id);
    record.active = true;
    record
}

/// Record that is dropped instead of reconnected after a failure
pub fn no_reconnect_record(id: &str) -> BotRecord {
    let mut record = bot_record(id);
    record.reconnect.enabled = false;
    record
}

/// Record that relays log lines
pub fn logging_record(id: &str) -> BotRecord {
    let mut record = bot_record(id);
    record.flags = BotFlags {
        anti_afk: false,
        logging: true,
    };
    record
}

// ── Event factory functions ─────────────────────────────────────────────────

pub fn connected_event(id: &str, generation: u64) -> BotEvent {
    BotEvent::Connected {
        bot_id: BotId::new(id),
        generation,
    }
}

pub fn disconnected_event(id: &str, generation: u64, reason: &str) -> BotEvent {
    BotEvent::Disconnected {
        bot_id: BotId::new(id),
        generation,
        reason: reason.to_string(),
    }
}

pub fn error_event(id: &str, generation: u64, message: &str) -> BotEvent {
    BotEvent::Error {
        bot_id: BotId::new(id),
        generation,
        message: message.to_string(),
    }
}

pub fn log_event(id: &str, generation: u64, line: &str) -> BotEvent {
    BotEvent::Log {
        bot_id: BotId::new(id),
        generation,
        line: line.to_string(),
    }
}
