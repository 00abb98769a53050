// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Unexpected disconnects, retry policy and manual reconnect

use super::*;
use mcb_adapters::ConnectionError;
use mcb_core::test_support::{bot_record, no_reconnect_record};
use mcb_core::{ErrorKind, RetryPolicy};

fn reconnect_delays(events: &[BotEvent]) -> Vec<u64> {
    events
        .iter()
        .filter_map(|e| match e {
            BotEvent::Reconnecting { delay_ms, .. } => Some(*delay_ms),
            _ => None,
        })
        .collect()
}

#[tokio::test]
async fn unexpected_disconnect_schedules_reconnect() {
    let mut ctx = setup([bot_record("b1")]);
    ctx.start_connected("b1").await;
    let mut rx = ctx.manager.subscribe(&bot("b1"));
    let generation = ctx.generation("b1");

    ctx.adapter.emit_disconnected("b1", "kicked").await;
    ctx.pump().await;

    let status = ctx.manager.status(&bot("b1"));
    assert_eq!(status.state, Some(ConnectionState::Reconnecting));
    assert_eq!(status.attempt, 1);
    let record = ctx.store.get("b1").unwrap();
    assert_eq!(record.status, BotStatus::Reconnecting);
    assert_eq!(record.last_error.as_deref(), Some("kicked"));

    assert_eq!(
        received(&mut rx),
        vec![
            BotEvent::Disconnected {
                bot_id: bot("b1"),
                generation,
                reason: "kicked".to_string()
            },
            BotEvent::Reconnecting {
                bot_id: bot("b1"),
                attempt: 1,
                delay_ms: 5000
            },
        ]
    );

    ctx.advance(Duration::from_secs(5)).await;
    assert_eq!(ctx.adapter.connect_count("b1"), 2);
}

#[tokio::test]
async fn reconnect_failure_schedules_another_attempt() {
    let mut ctx = setup([bot_record("b1")]);
    ctx.start_connected("b1").await;
    ctx.manager.stop(&bot("b1"), false).await;

    ctx.adapter
        .set_connect_error(ConnectionError::ConnectFailed("refused".to_string()));
    ctx.advance(Duration::from_secs(5)).await;

    assert_eq!(ctx.adapter.connect_count("b1"), 2);
    let status = ctx.manager.status(&bot("b1"));
    assert_eq!(status.state, Some(ConnectionState::Reconnecting));
    assert_eq!(status.attempt, 1);

    ctx.advance(Duration::from_secs(5)).await;
    assert_eq!(ctx.adapter.connect_count("b1"), 3);
    assert_eq!(ctx.state("b1"), Some(ConnectionState::Connecting));
}

#[tokio::test]
async fn exhausted_policy_drops_bot_and_persists_error() {
    let config = ManagerConfig {
        retry: RetryPolicy::default().with_max_attempts(2),
        ..ManagerConfig::default()
    };
    let mut ctx = setup_with_config([bot_record("b1")], config);
    let mut rx = ctx.manager.subscribe(&bot("b1"));
    ctx.start_connected("b1").await;

    for _ in 0..2 {
        ctx.adapter.emit_error("b1", "connection reset").await;
        ctx.pump().await;
        assert_eq!(ctx.state("b1"), Some(ConnectionState::Reconnecting));
        ctx.advance(Duration::from_secs(5)).await;
        assert_eq!(ctx.state("b1"), Some(ConnectionState::Connecting));
    }

    ctx.adapter.emit_error("b1", "connection reset").await;
    ctx.pump().await;

    assert!(!ctx.manager.status(&bot("b1")).running);
    let record = ctx.store.get("b1").unwrap();
    assert_eq!(record.status, BotStatus::Error);
    assert_eq!(record.last_error.as_deref(), Some("connection reset"));
    assert!(record.active);

    let events = received(&mut rx);
    assert_eq!(
        events.last(),
        Some(&BotEvent::GaveUp {
            bot_id: bot("b1"),
            attempts: 2
        })
    );
}

#[tokio::test]
async fn successful_handshake_resets_attempts() {
    let mut ctx = setup([bot_record("b1")]);
    ctx.start_connected("b1").await;

    ctx.adapter.emit_disconnected("b1", "timeout").await;
    ctx.pump().await;
    ctx.advance(Duration::from_secs(5)).await;
    assert_eq!(ctx.manager.status(&bot("b1")).attempt, 1);

    ctx.adapter.emit_connected("b1").await;
    ctx.pump().await;
    assert_eq!(ctx.manager.status(&bot("b1")).attempt, 0);
}

#[tokio::test]
async fn exponential_policy_grows_delay() {
    let config = ManagerConfig {
        retry: RetryPolicy::exponential(Duration::from_secs(1), Duration::from_secs(4)),
        ..ManagerConfig::default()
    };
    let mut record = bot_record("b1");
    record.reconnect.delay_ms = 0;
    let mut ctx = setup_with_config([record], config);
    let mut rx = ctx.manager.subscribe(&bot("b1"));
    ctx.start_connected("b1").await;

    for _ in 0..4 {
        ctx.adapter.emit_error("b1", "reset").await;
        ctx.pump().await;
        ctx.advance(Duration::from_secs(4)).await;
    }

    assert_eq!(
        reconnect_delays(&received(&mut rx)),
        vec![1000, 2000, 4000, 4000]
    );
}

#[tokio::test]
async fn bot_delay_replaces_policy_base() {
    let mut record = bot_record("b1");
    record.reconnect.delay_ms = 750;
    let mut ctx = setup([record]);
    let mut rx = ctx.manager.subscribe(&bot("b1"));
    ctx.start_connected("b1").await;

    ctx.adapter.emit_disconnected("b1", "reset").await;
    ctx.pump().await;

    assert_eq!(reconnect_delays(&received(&mut rx)), vec![750]);
    ctx.advance(Duration::from_millis(750)).await;
    assert_eq!(ctx.adapter.connect_count("b1"), 2);
}

#[tokio::test]
async fn disabled_reconnect_drops_bot_as_offline_on_disconnect() {
    let mut ctx = setup([no_reconnect_record("b1")]);
    ctx.start_connected("b1").await;
    let mut rx = ctx.manager.subscribe(&bot("b1"));

    ctx.adapter.emit_disconnected("b1", "server closed").await;
    ctx.pump().await;

    assert!(!ctx.manager.status(&bot("b1")).running);
    assert_eq!(ctx.stored_status("b1"), BotStatus::Offline);
    let events = received(&mut rx);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].name(), "disconnect");

    ctx.advance(Duration::from_secs(60)).await;
    assert_eq!(ctx.adapter.connect_count("b1"), 1);
}

#[tokio::test]
async fn disabled_reconnect_drops_bot_as_error_on_error() {
    let mut ctx = setup([no_reconnect_record("b1")]);
    ctx.start_connected("b1").await;

    ctx.adapter.emit_error("b1", "protocol error").await;
    ctx.pump().await;

    assert!(!ctx.manager.status(&bot("b1")).running);
    assert_eq!(ctx.stored_status("b1"), BotStatus::Error);
}

#[tokio::test]
async fn stale_disconnect_from_previous_session_is_ignored() {
    let mut ctx = setup([bot_record("b1")]);
    ctx.start_connected("b1").await;
    let old = ctx.generation("b1");
    ctx.manager.reconnect(&bot("b1")).await;
    ctx.adapter.emit_connected("b1").await;
    ctx.pump().await;

    ctx.manager
        .handle_event(BotEvent::Disconnected {
            bot_id: bot("b1"),
            generation: old,
            reason: "late".to_string(),
        })
        .await;

    assert_eq!(ctx.state("b1"), Some(ConnectionState::Connected));
    assert_eq!(ctx.manager.status(&bot("b1")).attempt, 0);
}

#[tokio::test]
async fn manual_reconnect_replaces_session() {
    let mut ctx = setup([bot_record("b1")]);
    ctx.start_connected("b1").await;
    let old = ctx.generation("b1");

    let result = ctx.manager.reconnect(&bot("b1")).await;

    assert_ok(&result);
    assert_eq!(ctx.state("b1"), Some(ConnectionState::Connecting));
    assert!(ctx.generation("b1") > old);
    assert!(ctx.adapter.calls().contains(&ConnectionCall::Disconnect {
        bot_id: bot("b1"),
        generation: old
    }));
    assert_eq!(ctx.adapter.connect_count("b1"), 2);
}

#[tokio::test]
async fn manual_reconnect_requires_running_bot() {
    let ctx = setup([bot_record("b1")]);
    assert!(ctx
        .manager
        .reconnect(&bot("b1"))
        .await
        .is_kind(ErrorKind::NotRunning));
}
