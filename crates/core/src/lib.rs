// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! mcb-core: shared types for the Minecraft bot lifecycle service

pub mod bot;
pub mod clock;
pub mod command;
pub mod connection;
pub mod event;
pub mod id;
pub mod owner;
pub mod result;
pub mod retry;
pub mod timer;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use bot::{
    AuthMode, BotFlags, BotId, BotRecord, BotStatus, ReconnectSettings, ServerAddress,
    StatusUpdate, DEFAULT_PORT, DEFAULT_RECONNECT_DELAY_MS,
};
pub use clock::{Clock, FakeClock, SystemClock};
pub use command::{Command, CommandError, CommandReply, Direction};
pub use connection::{ConnectionState, StatusSnapshot};
pub use event::BotEvent;
pub use id::{IdGen, SequentialIdGen, UuidIdGen};
pub use owner::OwnerId;
pub use result::{ErrorKind, OpResult};
pub use retry::{Backoff, RetryPolicy};
pub use timer::{TimerId, TimerKind};
