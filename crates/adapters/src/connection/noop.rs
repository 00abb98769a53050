// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op connection adapter for when bot hosting is disabled.

use super::{ConnectSpec, ConnectionAdapter, ConnectionError, ConnectionHandle};
use async_trait::async_trait;
use mcb_core::{BotEvent, Command, CommandReply};
use tokio::sync::mpsc;

/// Connection adapter that does nothing.
///
/// Sessions never complete their handshake, so bots started through it stay
/// in `connecting` until stopped or timed out.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpConnectionAdapter;

impl NoOpConnectionAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConnectionAdapter for NoOpConnectionAdapter {
    async fn connect(
        &self,
        spec: ConnectSpec,
        _event_tx: mpsc::Sender<BotEvent>,
    ) -> Result<ConnectionHandle, ConnectionError> {
        Ok(ConnectionHandle::new(spec.bot_id, spec.generation, "noop"))
    }

    async fn send(
        &self,
        _handle: &ConnectionHandle,
        command: &Command,
    ) -> Result<CommandReply, ConnectionError> {
        Ok(CommandReply::new(format!("{} ignored", command.name())))
    }

    async fn disconnect(&self, _handle: &ConnectionHandle) -> Result<(), ConnectionError> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "noop_tests.rs"]
mod tests;
