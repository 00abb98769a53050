// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Live connection registry.
//!
//! The registry is the only source of truth for "is this bot running". It
//! holds at most one [`LiveConnection`] per bot id.

use mcb_adapters::ConnectionHandle;
use mcb_core::{BotId, BotRecord, ConnectionState, StatusSnapshot};
use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;

/// In-memory state for one running bot
#[derive(Debug, Clone)]
pub struct LiveConnection {
    pub state: ConnectionState,
    pub last_activity_ms: u64,
    /// `None` while a connect call is in flight or a reconnect is pending
    pub handle: Option<ConnectionHandle>,
    /// Attempt this entry currently belongs to
    pub generation: u64,
    /// Consecutive failed attempts since the last successful handshake
    pub attempt: u32,
    /// Record snapshot used to reconnect without a store round-trip
    pub record: BotRecord,
}

impl LiveConnection {
    /// Move to `next`, noting edges outside the state machine
    pub fn set_state(&mut self, next: ConnectionState) {
        if !self.state.can_transition_to(next) {
            tracing::debug!(
                bot_id = %self.record.id,
                from = %self.state,
                to = %next,
                "off-graph state transition",
            );
        }
        self.state = next;
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        StatusSnapshot {
            bot_id: self.record.id.clone(),
            running: true,
            connected: self.state == ConnectionState::Connected,
            state: Some(self.state),
            last_activity_ms: Some(self.last_activity_ms),
            attempt: self.attempt,
        }
    }
}

/// Registry of live connections.
///
/// Generations come from one counter shared by every bot and never reset,
/// so a removed and re-added bot can never reuse a generation that a stale
/// timer or event still carries.
#[derive(Debug, Default)]
pub struct Registry {
    entries: HashMap<BotId, LiveConnection>,
    last_generation: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_generation(&mut self) -> u64 {
        self.last_generation += 1;
        self.last_generation
    }

    pub fn get<Q>(&self, id: &Q) -> Option<&LiveConnection>
    where
        BotId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get(id)
    }

    pub fn get_mut<Q>(&mut self, id: &Q) -> Option<&mut LiveConnection>
    where
        BotId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.get_mut(id)
    }

    pub fn contains<Q>(&self, id: &Q) -> bool
    where
        BotId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.contains_key(id)
    }

    /// Entry for `id` only if it is still on `generation`
    pub fn current_mut<Q>(&mut self, id: &Q, generation: u64) -> Option<&mut LiveConnection>
    where
        BotId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .get_mut(id)
            .filter(|entry| entry.generation == generation)
    }

    /// Register a new `connecting` entry unless one already exists.
    ///
    /// Returns the new entry's generation, or `None` if the bot was already
    /// registered.
    pub fn insert_connecting(&mut self, record: BotRecord, now_ms: u64) -> Option<u64> {
        if self.entries.contains_key(&record.id) {
            return None;
        }
        let generation = self.next_generation();
        self.entries.insert(
            record.id.clone(),
            LiveConnection {
                state: ConnectionState::Connecting,
                last_activity_ms: now_ms,
                handle: None,
                generation,
                attempt: 0,
                record,
            },
        );
        Some(generation)
    }

    pub fn remove<Q>(&mut self, id: &Q) -> Option<LiveConnection>
    where
        BotId: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.remove(id)
    }

    /// Remove every entry, returning them
    pub fn drain(&mut self) -> Vec<LiveConnection> {
        self.entries.drain().map(|(_, entry)| entry).collect()
    }

    /// Snapshots of every entry, ordered by bot id
    pub fn snapshots(&self) -> Vec<StatusSnapshot> {
        let mut out: Vec<_> = self.entries.values().map(LiveConnection::snapshot).collect();
        out.sort_by(|a, b| a.bot_id.cmp(&b.bot_id));
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
