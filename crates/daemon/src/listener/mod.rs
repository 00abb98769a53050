// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Listener task for handling socket I/O.
//!
//! The Listener runs in a spawned task, accepting connections and
//! handling them without blocking the engine loop. Each connection
//! carries one request; `Subscribe` keeps the connection open and
//! streams events until the client hangs up.

mod bots;
mod subscribe;

use std::sync::Arc;

use mcb_adapters::ConnectionAdapter;
use mcb_core::Clock;
use mcb_engine::BotManager;
use mcb_storage::BotStore;
use thiserror::Error;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use crate::protocol::{self, Request, Response, DEFAULT_TIMEOUT};

/// Shared state every connection handler needs
pub struct ListenCtx<A, S, C: Clock> {
    pub manager: Arc<BotManager<A, S, C>>,
    pub shutdown: Arc<Notify>,
}

/// Listener task for accepting socket connections.
pub struct Listener<A, S, C: Clock> {
    socket: UnixListener,
    ctx: Arc<ListenCtx<A, S, C>>,
}

/// Errors from connection handling.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),
}

impl<A, S, C> Listener<A, S, C>
where
    A: ConnectionAdapter,
    S: BotStore,
    C: Clock,
{
    pub fn new(socket: UnixListener, ctx: ListenCtx<A, S, C>) -> Self {
        Self {
            socket,
            ctx: Arc::new(ctx),
        }
    }

    /// Run the listener loop until shutdown, spawning tasks for each connection.
    pub async fn run(self) {
        loop {
            match self.socket.accept().await {
                Ok((stream, _)) => {
                    let ctx = Arc::clone(&self.ctx);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection(stream, &ctx).await {
                            match e {
                                ConnectionError::Protocol(
                                    protocol::ProtocolError::ConnectionClosed,
                                ) => debug!("Client disconnected"),
                                ConnectionError::Protocol(protocol::ProtocolError::Timeout) => {
                                    warn!("Connection timeout")
                                }
                                _ => error!("Connection error: {}", e),
                            }
                        }
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}

/// Handle a single client connection.
async fn handle_connection<A, S, C>(
    stream: UnixStream,
    ctx: &ListenCtx<A, S, C>,
) -> Result<(), ConnectionError>
where
    A: ConnectionAdapter,
    S: BotStore,
    C: Clock,
{
    let (mut reader, mut writer) = stream.into_split();

    let request = protocol::read_request(&mut reader, DEFAULT_TIMEOUT).await?;

    // Polling requests at debug level, everything else at info
    if matches!(
        request,
        Request::Ping | Request::Status { .. } | Request::List
    ) {
        debug!(request = ?request, "received request");
    } else {
        info!(request = ?request, "received request");
    }

    if let Request::Subscribe { bot_id } = request {
        return subscribe::stream_events(&mut reader, &mut writer, &ctx.manager, bot_id).await;
    }

    let response = handle_request(request, ctx).await;
    debug!("Sending response: {:?}", response);
    protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await?;

    Ok(())
}

/// Handle a single request and return a response.
async fn handle_request<A, S, C>(request: Request, ctx: &ListenCtx<A, S, C>) -> Response
where
    A: ConnectionAdapter,
    S: BotStore,
    C: Clock,
{
    let manager = &ctx.manager;
    match request {
        Request::Ping => Response::Pong,

        Request::Start { bot_id } => Response::Result {
            result: manager.start(&bot_id).await,
        },

        Request::Stop { bot_id, permanent } => Response::Result {
            result: manager.stop(&bot_id, permanent).await,
        },

        Request::Reconnect { bot_id } => Response::Result {
            result: manager.reconnect(&bot_id).await,
        },

        Request::Register { record } => bots::handle_register(manager, record).await,

        Request::Delete { bot_id } => bots::handle_delete(manager, bot_id).await,

        Request::Command {
            bot_id,
            name,
            params,
        } => Response::Result {
            result: manager.send_command(&bot_id, &name, &params).await,
        },

        Request::Status { bot_id } => Response::Status {
            status: manager.status(&bot_id),
        },

        Request::List => Response::Statuses {
            bots: manager.statuses(),
        },

        // Routed to the streaming path before dispatch
        Request::Subscribe { .. } => Response::error("subscribe must open its own connection"),

        Request::Shutdown => {
            ctx.shutdown.notify_one();
            Response::ShuttingDown
        }
    }
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
