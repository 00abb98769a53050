// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Lifecycle manager tests

mod commands;
mod events;
mod reconnect;
mod start;
mod stop;

use super::*;
use mcb_adapters::{ConnectionCall, FakeConnectionAdapter};
use mcb_core::{BotStatus, ConnectionState, FakeClock, OpResult};
use mcb_storage::MemoryStore;
use tokio::sync::broadcast;

type TestManager = BotManager<FakeConnectionAdapter, MemoryStore, FakeClock>;

/// Test context holding the manager and its fakes
struct TestContext {
    manager: TestManager,
    adapter: FakeConnectionAdapter,
    store: MemoryStore,
    clock: FakeClock,
    event_rx: mpsc::Receiver<BotEvent>,
}

fn setup(records: impl IntoIterator<Item = BotRecord>) -> TestContext {
    setup_with_config(records, ManagerConfig::default())
}

fn setup_with_config(
    records: impl IntoIterator<Item = BotRecord>,
    config: ManagerConfig,
) -> TestContext {
    let adapter = FakeConnectionAdapter::new();
    let store = MemoryStore::with_records(records);
    let clock = FakeClock::new();
    let (event_tx, event_rx) = mpsc::channel(64);

    let manager = BotManager::new(
        ManagerDeps {
            adapter: adapter.clone(),
            store: store.clone(),
        },
        clock.clone(),
        config,
        event_tx,
    );

    TestContext {
        manager,
        adapter,
        store,
        clock,
        event_rx,
    }
}

fn bot(id: &str) -> BotId {
    BotId::new(id)
}

impl TestContext {
    /// Feed every queued adapter event to the manager, as the daemon loop does
    async fn pump(&mut self) {
        while let Ok(event) = self.event_rx.try_recv() {
            self.manager.handle_event(event).await;
        }
    }

    /// Start a bot and complete its handshake
    async fn start_connected(&mut self, id: &str) {
        let result = self.manager.start(&bot(id)).await;
        assert!(result.success, "start failed: {}", result.message);
        self.adapter.emit_connected(id).await;
        self.pump().await;
        assert!(self.manager.status(&bot(id)).connected);
    }

    /// Advance the clock and fire due timers
    async fn advance(&mut self, by: Duration) {
        self.clock.advance(by);
        self.manager.tick(self.clock.now()).await;
    }

    fn state(&self, id: &str) -> Option<ConnectionState> {
        self.manager.status(&bot(id)).state
    }

    fn stored_status(&self, id: &str) -> BotStatus {
        self.store.get(id).map(|r| r.status).unwrap_or_default()
    }

    fn generation(&self, id: &str) -> u64 {
        self.manager
            .registry
            .lock()
            .get(id)
            .map(|e| e.generation)
            .unwrap_or_default()
    }
}

/// Collect everything currently buffered on a relay receiver
fn received(rx: &mut broadcast::Receiver<BotEvent>) -> Vec<BotEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn assert_ok(result: &OpResult) {
    assert!(result.success, "expected success, got: {result:?}");
}
