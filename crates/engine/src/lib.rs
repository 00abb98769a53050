// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Bot lifecycle engine

mod manager;
mod registry;
mod relay;
mod scheduler;

pub use manager::{BotManager, ManagerConfig, ManagerDeps, DEFAULT_CONNECT_TIMEOUT};
pub use registry::{LiveConnection, Registry};
pub use relay::EventRelay;
pub use scheduler::Scheduler;
