// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-bot event relay.
//!
//! Each bot has a room named after its id. Subscribers receive events
//! published after they joined; there is no buffering or replay.

use mcb_core::{BotEvent, BotId};
use parking_lot::Mutex;
use std::collections::HashMap;
use tokio::sync::broadcast;

/// Per-subscriber backlog before the slowest receiver starts lagging
const ROOM_CAPACITY: usize = 256;

/// Fan-out of bot events to the subscribers of each bot's room
#[derive(Default)]
pub struct EventRelay {
    rooms: Mutex<HashMap<BotId, broadcast::Sender<BotEvent>>>,
}

impl EventRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the room for `bot_id`.
    ///
    /// Rooms whose subscribers have all gone are dropped first.
    pub fn subscribe(&self, bot_id: &BotId) -> broadcast::Receiver<BotEvent> {
        let mut rooms = self.rooms.lock();
        prune(&mut rooms);
        rooms
            .entry(bot_id.clone())
            .or_insert_with(|| broadcast::channel(ROOM_CAPACITY).0)
            .subscribe()
    }

    /// Deliver an event to the current members of its bot's room.
    ///
    /// Returns the number of subscribers that received it. Rooms left
    /// without receivers are dropped.
    pub fn publish(&self, event: BotEvent) -> usize {
        let mut rooms = self.rooms.lock();
        let bot_id = event.bot_id().clone();
        let Some(tx) = rooms.get(&bot_id) else {
            return 0;
        };
        match tx.send(event) {
            Ok(n) => n,
            Err(_) => {
                rooms.remove(&bot_id);
                0
            }
        }
    }

    /// Number of live subscribers in a room
    pub fn subscriber_count(&self, bot_id: &str) -> usize {
        self.rooms
            .lock()
            .get(bot_id)
            .map_or(0, broadcast::Sender::receiver_count)
    }

    /// Drop every room left without receivers
    pub fn prune(&self) {
        prune(&mut self.rooms.lock());
    }

    /// Number of rooms that still have receivers
    pub fn room_count(&self) -> usize {
        let mut rooms = self.rooms.lock();
        prune(&mut rooms);
        rooms.len()
    }
}

fn prune(rooms: &mut HashMap<BotId, broadcast::Sender<BotEvent>>) {
    rooms.retain(|_, tx| tx.receiver_count() > 0);
}

#[cfg(test)]
#[path = "relay_tests.rs"]
mod tests;
