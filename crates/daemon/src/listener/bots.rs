// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record management requests: register and delete.

use mcb_adapters::ConnectionAdapter;
use mcb_core::{BotId, BotRecord, Clock, ErrorKind, OpResult};
use mcb_engine::BotManager;
use mcb_storage::BotStore;
use tracing::info;

use crate::protocol::Response;

/// Create or replace a stored record.
///
/// A running bot keeps the record it was started with until its next
/// connection attempt.
pub(super) async fn handle_register<A, S, C>(
    manager: &BotManager<A, S, C>,
    record: BotRecord,
) -> Response
where
    A: ConnectionAdapter,
    S: BotStore,
    C: Clock,
{
    let bot_id = record.id.clone();
    if record.name.trim().is_empty() {
        return Response::Result {
            result: OpResult::fail(ErrorKind::InvalidParams, "Bot name must not be empty"),
        };
    }

    let result = match manager.store().upsert(record).await {
        Ok(()) => {
            info!(%bot_id, "bot registered");
            OpResult::ok("Bot registered")
        }
        Err(e) => OpResult::fail(ErrorKind::Underlying, format!("Failed to save bot: {e}")),
    };
    Response::Result { result }
}

/// Disconnect a bot if running, then delete its record
pub(super) async fn handle_delete<A, S, C>(manager: &BotManager<A, S, C>, bot_id: BotId) -> Response
where
    A: ConnectionAdapter,
    S: BotStore,
    C: Clock,
{
    let removed = manager.remove(&bot_id).await;

    let result = match manager.store().delete(&bot_id).await {
        Ok(Some(_)) => {
            info!(%bot_id, "bot deleted");
            OpResult::ok("Bot deleted")
        }
        Ok(None) if removed.success => OpResult::ok("Bot deleted"),
        Ok(None) => OpResult::not_found(),
        Err(e) => OpResult::fail(ErrorKind::Underlying, format!("Failed to delete bot: {e}")),
    };
    Response::Result { result }
}

#[cfg(test)]
#[path = "bots_tests.rs"]
mod tests;
