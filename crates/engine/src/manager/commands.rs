// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command dispatch to connected bots

use super::BotManager;
use mcb_adapters::ConnectionAdapter;
use mcb_core::{BotId, Clock, Command, CommandError, ConnectionState, ErrorKind, OpResult};
use mcb_storage::BotStore;
use serde_json::Value;

impl<A, S, C> BotManager<A, S, C>
where
    A: ConnectionAdapter,
    S: BotStore,
    C: Clock,
{
    /// Send a named command to a connected bot.
    ///
    /// The adapter is only called once the bot is `connected` and the
    /// params have been validated.
    pub async fn send_command(&self, bot_id: &BotId, name: &str, params: &Value) -> OpResult {
        let handle = {
            let registry = self.registry.lock();
            let Some(entry) = registry.get(bot_id) else {
                return OpResult::not_running();
            };
            match (&entry.handle, entry.state) {
                (Some(handle), ConnectionState::Connected) => handle.clone(),
                _ => return OpResult::not_connected(),
            }
        };

        let command = match Command::parse(name, params) {
            Ok(command) => command,
            Err(e @ CommandError::Unknown(_)) => {
                return OpResult::fail(ErrorKind::UnknownCommand, e.to_string())
            }
            Err(e @ CommandError::InvalidParams { .. }) => {
                return OpResult::fail(ErrorKind::InvalidParams, e.to_string())
            }
        };

        match self.adapter.send(&handle, &command).await {
            Ok(reply) => {
                let now_ms = self.clock.epoch_ms();
                if let Some(entry) = self.registry.lock().current_mut(bot_id, handle.generation) {
                    entry.last_activity_ms = now_ms;
                }
                tracing::debug!(%bot_id, command = command.name(), "command sent");
                OpResult::ok(reply.message).with_data(reply.data)
            }
            Err(e) => {
                tracing::warn!(%bot_id, command = command.name(), error = %e, "command failed");
                OpResult::fail(ErrorKind::Underlying, format!("Command failed: {e}"))
            }
        }
    }
}
