// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event streaming for `Subscribe` connections.

use mcb_adapters::ConnectionAdapter;
use mcb_core::{BotEvent, BotId, Clock};
use mcb_engine::BotManager;
use mcb_storage::BotStore;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use super::ConnectionError;
use crate::protocol::{self, Response, DEFAULT_TIMEOUT};

/// Forward a bot's relayed events to the client until either side closes.
///
/// The client sends nothing after the request; a read returning EOF ends
/// the stream.
pub(super) async fn stream_events<A, S, C, R, W>(
    reader: &mut R,
    writer: &mut W,
    manager: &BotManager<A, S, C>,
    bot_id: BotId,
) -> Result<(), ConnectionError>
where
    A: ConnectionAdapter,
    S: BotStore,
    C: Clock,
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut events = manager.subscribe(&bot_id);
    protocol::write_response(
        writer,
        &Response::Subscribed {
            bot_id: bot_id.clone(),
        },
        DEFAULT_TIMEOUT,
    )
    .await?;

    let result = forward(reader, writer, &mut events, &bot_id).await;
    manager.unsubscribe(events);
    result
}

async fn forward<R, W>(
    reader: &mut R,
    writer: &mut W,
    events: &mut broadcast::Receiver<BotEvent>,
    bot_id: &BotId,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut scratch = [0u8; 64];
    loop {
        tokio::select! {
            read = reader.read(&mut scratch) => {
                match read {
                    Ok(0) | Err(_) => {
                        debug!(%bot_id, "subscriber hung up");
                        return Ok(());
                    }
                    Ok(_) => {}
                }
            }
            event = events.recv() => {
                match event {
                    Ok(event) => {
                        let frame = Response::Event { event };
                        protocol::write_response(writer, &frame, DEFAULT_TIMEOUT).await?;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(%bot_id, skipped, "subscriber fell behind, events dropped");
                    }
                    Err(RecvError::Closed) => return Ok(()),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "subscribe_tests.rs"]
mod tests;
