// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced adapter wrapper for consistent observability

use crate::connection::{ConnectSpec, ConnectionAdapter, ConnectionError, ConnectionHandle};
use async_trait::async_trait;
use mcb_core::{BotEvent, Command, CommandReply};
use tokio::sync::mpsc;
use tracing::Instrument;

/// Wrapper that adds tracing to any ConnectionAdapter
#[derive(Clone)]
pub struct TracedConnection<A> {
    inner: A,
}

impl<A> TracedConnection<A> {
    pub fn new(inner: A) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &A {
        &self.inner
    }
}

#[async_trait]
impl<A: ConnectionAdapter> ConnectionAdapter for TracedConnection<A> {
    async fn connect(
        &self,
        spec: ConnectSpec,
        event_tx: mpsc::Sender<BotEvent>,
    ) -> Result<ConnectionHandle, ConnectionError> {
        let span = tracing::info_span!(
            "connection.connect",
            bot_id = %spec.bot_id,
            generation = spec.generation,
            server = %spec.server,
        );
        async {
            tracing::info!(username = %spec.username, auth = ?spec.auth, "connecting");
            let start = std::time::Instant::now();
            let result = self.inner.connect(spec, event_tx).await;
            let elapsed_ms = start.elapsed().as_millis() as u64;
            match &result {
                Ok(h) => tracing::info!(session_id = %h.session_id, elapsed_ms, "session opened"),
                Err(e) => tracing::error!(elapsed_ms, error = %e, "connect failed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn send(
        &self,
        handle: &ConnectionHandle,
        command: &Command,
    ) -> Result<CommandReply, ConnectionError> {
        tracing::info_span!("connection.send", bot_id = %handle.bot_id)
            .in_scope(|| tracing::debug!(command = command.name(), "sending"));
        let result = self.inner.send(handle, command).await;
        if let Err(ref e) = result {
            tracing::error!(bot_id = %handle.bot_id, command = command.name(), error = %e, "send failed");
        }
        result
    }

    async fn disconnect(&self, handle: &ConnectionHandle) -> Result<(), ConnectionError> {
        let result = self.inner.disconnect(handle).await;
        tracing::info_span!(
            "connection.disconnect",
            bot_id = %handle.bot_id,
            generation = handle.generation
        )
        .in_scope(|| match &result {
            Ok(()) => tracing::info!("disconnected"),
            Err(e) => tracing::warn!(error = %e, "disconnect failed (may be expected)"),
        });
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
