// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Stop, remove and shutdown

use super::*;
use async_trait::async_trait;
use mcb_core::test_support::{active_record, bot_record, connected_event};
use mcb_core::{ErrorKind, TimerId};
use mcb_storage::{BotFilter, StoreError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[tokio::test]
async fn stop_not_running_bot() {
    let ctx = setup([bot_record("b1")]);

    for permanent in [true, false] {
        let result = ctx.manager.stop(&bot("b1"), permanent).await;
        assert!(result.is_kind(ErrorKind::NotRunning));
        assert_eq!(result.message, "Bot is not running");
    }
    assert!(ctx.adapter.calls().is_empty());
}

#[tokio::test]
async fn permanent_stop_removes_entry_and_clears_intent() {
    let mut ctx = setup([bot_record("b1")]);
    ctx.start_connected("b1").await;
    let generation = ctx.generation("b1");
    let mut rx = ctx.manager.subscribe(&bot("b1"));

    let result = ctx.manager.stop(&bot("b1"), true).await;

    assert_ok(&result);
    assert!(!ctx.manager.status(&bot("b1")).running);
    let record = ctx.store.get("b1").unwrap();
    assert!(!record.active);
    assert_eq!(record.status, BotStatus::Offline);
    assert_eq!(
        ctx.adapter.calls().last(),
        Some(&ConnectionCall::Disconnect {
            bot_id: bot("b1"),
            generation
        })
    );
    assert_eq!(
        received(&mut rx),
        vec![BotEvent::Disconnected {
            bot_id: bot("b1"),
            generation,
            reason: "stopped".to_string()
        }]
    );
}

#[tokio::test]
async fn non_permanent_stop_schedules_reconnect() {
    let mut ctx = setup([bot_record("b1")]);
    ctx.start_connected("b1").await;
    let mut rx = ctx.manager.subscribe(&bot("b1"));

    let result = ctx.manager.stop(&bot("b1"), false).await;

    assert_ok(&result);
    assert_eq!(result.message, "Bot will reconnect in 5000ms");
    assert_eq!(ctx.state("b1"), Some(ConnectionState::Reconnecting));
    assert_eq!(ctx.stored_status("b1"), BotStatus::Reconnecting);
    assert!(ctx.store.get("b1").unwrap().active);
    assert_eq!(
        received(&mut rx),
        vec![BotEvent::Reconnecting {
            bot_id: bot("b1"),
            attempt: 0,
            delay_ms: 5000
        }]
    );

    ctx.advance(Duration::from_millis(4999)).await;
    assert_eq!(ctx.adapter.connect_count("b1"), 1);

    ctx.advance(Duration::from_millis(1)).await;
    assert_eq!(ctx.adapter.connect_count("b1"), 2);
    assert_eq!(ctx.state("b1"), Some(ConnectionState::Connecting));

    ctx.adapter.emit_connected("b1").await;
    ctx.pump().await;
    assert!(ctx.manager.status(&bot("b1")).connected);
}

#[tokio::test]
async fn timer_from_before_permanent_stop_never_restarts_bot() {
    let mut ctx = setup([bot_record("b1")]);
    ctx.start_connected("b1").await;

    ctx.manager.stop(&bot("b1"), false).await;
    ctx.manager.stop(&bot("b1"), true).await;

    ctx.advance(Duration::from_secs(60)).await;

    assert!(!ctx.manager.status(&bot("b1")).running);
    assert_eq!(ctx.adapter.connect_count("b1"), 1);
}

#[tokio::test]
async fn stale_timer_for_restarted_bot_is_ignored() {
    let mut ctx = setup([bot_record("b1")]);
    ctx.start_connected("b1").await;
    let old = ctx.generation("b1");

    ctx.manager.stop(&bot("b1"), true).await;
    ctx.start_connected("b1").await;
    ctx.manager.scheduler.lock().set_timer(
        TimerId::reconnect(&bot("b1"), old),
        Duration::from_secs(1),
        ctx.clock.now(),
    );

    ctx.advance(Duration::from_secs(2)).await;

    assert_eq!(ctx.state("b1"), Some(ConnectionState::Connected));
    assert_eq!(ctx.adapter.connect_count("b1"), 2);
}

#[tokio::test]
async fn stale_connect_after_stop_is_ignored() {
    let ctx = setup([bot_record("b1")]);
    ctx.manager.start(&bot("b1")).await;
    let generation = ctx.generation("b1");
    ctx.manager.stop(&bot("b1"), true).await;

    ctx.manager
        .handle_event(connected_event("b1", generation))
        .await;

    assert!(!ctx.manager.status(&bot("b1")).running);
    assert_eq!(ctx.stored_status("b1"), BotStatus::Offline);
}

#[tokio::test]
async fn remove_drops_bot_without_store_write() {
    let mut ctx = setup([bot_record("b1")]);
    ctx.start_connected("b1").await;
    ctx.store.set_unavailable(true);

    let result = ctx.manager.remove(&bot("b1")).await;

    assert_ok(&result);
    assert!(!ctx.manager.status(&bot("b1")).running);
    let record = ctx.store.get("b1").unwrap();
    assert!(record.active);
    assert_eq!(record.status, BotStatus::Online);

    assert!(ctx
        .manager
        .remove(&bot("b1"))
        .await
        .is_kind(ErrorKind::NotRunning));
}

#[tokio::test]
async fn shutdown_disconnects_everything_and_keeps_intent() {
    let mut ctx = setup([active_record("b1"), active_record("b2")]);
    ctx.start_connected("b1").await;
    ctx.manager.start(&bot("b2")).await;

    ctx.manager.shutdown().await;

    assert!(ctx.manager.statuses().is_empty());
    assert!(!ctx.manager.scheduler.lock().has_timers());
    for id in ["b1", "b2"] {
        let record = ctx.store.get(id).unwrap();
        assert!(record.active, "{id} should stay active");
        assert_eq!(record.status, BotStatus::Offline);
    }
    let disconnects = ctx
        .adapter
        .calls()
        .into_iter()
        .filter(|c| matches!(c, ConnectionCall::Disconnect { .. }))
        .count();
    assert_eq!(disconnects, 2);
}

/// Store whose first `active = true` write parks until released
#[derive(Clone)]
struct GatedStore {
    inner: MemoryStore,
    armed: Arc<AtomicBool>,
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

#[async_trait]
impl BotStore for GatedStore {
    async fn find_by_id(&self, id: &BotId) -> Result<Option<BotRecord>, StoreError> {
        self.inner.find_by_id(id).await
    }

    async fn find(&self, filter: &BotFilter) -> Result<Vec<BotRecord>, StoreError> {
        self.inner.find(filter).await
    }

    async fn update_status(
        &self,
        id: &BotId,
        update: StatusUpdate,
    ) -> Result<BotRecord, StoreError> {
        if update.active == Some(true) && self.armed.swap(false, Ordering::SeqCst) {
            self.entered.notify_one();
            self.release.notified().await;
        }
        self.inner.update_status(id, update).await
    }

    async fn upsert(&self, record: BotRecord) -> Result<(), StoreError> {
        self.inner.upsert(record).await
    }

    async fn delete(&self, id: &BotId) -> Result<Option<BotRecord>, StoreError> {
        self.inner.delete(id).await
    }
}

#[tokio::test]
async fn permanent_stop_during_start_keeps_bot_inactive() {
    let adapter = FakeConnectionAdapter::new();
    let store = GatedStore {
        inner: MemoryStore::with_records([bot_record("b1")]),
        armed: Arc::new(AtomicBool::new(true)),
        entered: Arc::new(Notify::new()),
        release: Arc::new(Notify::new()),
    };
    let (event_tx, _event_rx) = mpsc::channel(64);
    let manager = BotManager::new(
        ManagerDeps {
            adapter: adapter.clone(),
            store: store.clone(),
        },
        FakeClock::new(),
        ManagerConfig::default(),
        event_tx,
    );
    let id = bot("b1");

    let stop_midway = async {
        store.entered.notified().await;
        let stopped = manager.stop(&id, true).await;
        store.release.notify_one();
        stopped
    };
    let (started, stopped) = tokio::join!(manager.start(&id), stop_midway);

    assert_ok(&stopped);
    assert!(started.is_kind(ErrorKind::NotRunning));
    assert!(!manager.status(&id).running);
    assert_eq!(adapter.connect_count("b1"), 0);

    let record = store.inner.get("b1").unwrap();
    assert!(!record.active);
    assert_eq!(record.status, BotStatus::Offline);
    assert!(manager.store().find(&BotFilter::active()).await.unwrap().is_empty());
}
