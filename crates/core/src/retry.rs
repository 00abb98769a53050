// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reconnect retry policy.
//!
//! The manager asks the policy for the delay before each reconnect attempt.
//! `None` means the policy is exhausted and the bot should be dropped.

use crate::bot::DEFAULT_RECONNECT_DELAY_MS;
use std::time::Duration;

/// Delay growth between attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backoff {
    /// Same delay before every attempt
    Constant { delay: Duration },
    /// `base * factor^(attempt - 1)`, capped at `max`
    Exponential {
        base: Duration,
        factor: u32,
        max: Duration,
    },
}

/// Backoff plus an optional attempt cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub backoff: Backoff,
    /// `None` retries forever
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::constant(Duration::from_millis(DEFAULT_RECONNECT_DELAY_MS))
    }
}

impl RetryPolicy {
    /// Fixed delay, unbounded attempts
    pub fn constant(delay: Duration) -> Self {
        Self {
            backoff: Backoff::Constant { delay },
            max_attempts: None,
        }
    }

    /// Doubling delay from `base` up to `max`, unbounded attempts
    pub fn exponential(base: Duration, max: Duration) -> Self {
        Self {
            backoff: Backoff::Exponential {
                base,
                factor: 2,
                max,
            },
            max_attempts: None,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// Same policy shape with a different starting delay.
    ///
    /// Used to apply a bot's own reconnect delay on top of the daemon-wide
    /// policy.
    pub fn with_base_delay(mut self, delay: Duration) -> Self {
        self.backoff = match self.backoff {
            Backoff::Constant { .. } => Backoff::Constant { delay },
            Backoff::Exponential { factor, max, .. } => Backoff::Exponential {
                base: delay,
                factor,
                max: max.max(delay),
            },
        };
        self
    }

    /// Delay before the 1-based `attempt`, or `None` once attempts are exhausted
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 {
            return Some(Duration::ZERO);
        }
        if self.max_attempts.is_some_and(|max| attempt > max) {
            return None;
        }
        let delay = match self.backoff {
            Backoff::Constant { delay } => delay,
            Backoff::Exponential { base, factor, max } => {
                let multiplier = factor.max(1).checked_pow(attempt - 1).unwrap_or(u32::MAX);
                base.checked_mul(multiplier).unwrap_or(max).min(max)
            }
        };
        Some(delay)
    }
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
