// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Timer and scheduling management

use mcb_core::{BotId, TimerId};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Timer entry
#[derive(Debug, Clone)]
struct Timer {
    fires_at: Instant,
}

/// Polled timers for reconnect attempts and handshake deadlines.
///
/// Nothing fires on its own: the daemon loop calls [`Scheduler::fired_timers`]
/// on every tick.
#[derive(Debug, Default)]
pub struct Scheduler {
    timers: HashMap<TimerId, Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a timer, replacing any existing timer with the same id
    pub fn set_timer(&mut self, id: TimerId, duration: Duration, now: Instant) {
        let fires_at = now + duration;
        self.timers.insert(id, Timer { fires_at });
    }

    pub fn cancel_timer(&mut self, id: &TimerId) {
        self.timers.remove(id);
    }

    /// Cancel every timer belonging to a bot, whatever its generation
    pub fn cancel_bot_timers(&mut self, bot_id: &BotId) {
        self.timers.retain(|id, _| !id.is_for(bot_id));
    }

    /// Remove and return all due timers, earliest first
    pub fn fired_timers(&mut self, now: Instant) -> Vec<TimerId> {
        let mut due: Vec<(Instant, TimerId)> = self
            .timers
            .iter()
            .filter(|(_, t)| t.fires_at <= now)
            .map(|(id, t)| (t.fires_at, id.clone()))
            .collect();
        due.sort();

        for (_, id) in &due {
            self.timers.remove(id);
        }

        due.into_iter().map(|(_, id)| id).collect()
    }

    /// Get the next timer fire time
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().map(|t| t.fires_at).min()
    }

    pub fn has_timers(&self) -> bool {
        !self.timers.is_empty()
    }

    pub fn is_scheduled(&self, id: &TimerId) -> bool {
        self.timers.contains_key(id)
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
