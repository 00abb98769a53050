// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Start operation and handshake completion

use super::*;
use mcb_adapters::ConnectionError;
use mcb_core::test_support::{bot_record, no_reconnect_record};
use mcb_core::ErrorKind;

#[tokio::test]
async fn start_registers_connecting_entry_and_persists_intent() {
    let ctx = setup([bot_record("b1")]);

    let result = ctx.manager.start(&bot("b1")).await;

    assert_ok(&result);
    assert_eq!(result.message, "Bot is starting");
    assert_eq!(ctx.state("b1"), Some(ConnectionState::Connecting));
    let record = ctx.store.get("b1").unwrap();
    assert!(record.active);
    assert_eq!(record.status, BotStatus::Connecting);
    assert_eq!(ctx.adapter.connect_count("b1"), 1);
}

#[tokio::test]
async fn start_unknown_bot_is_not_found() {
    let ctx = setup([]);

    let result = ctx.manager.start(&bot("ghost")).await;

    assert!(result.is_kind(ErrorKind::NotFound));
    assert!(ctx.manager.statuses().is_empty());
    assert!(ctx.adapter.calls().is_empty());
}

#[tokio::test]
async fn start_twice_keeps_single_entry() {
    let ctx = setup([bot_record("b1")]);

    assert_ok(&ctx.manager.start(&bot("b1")).await);
    let again = ctx.manager.start(&bot("b1")).await;

    assert_ok(&again);
    assert_eq!(again.message, "Bot is already running");
    assert_eq!(ctx.manager.statuses().len(), 1);
    assert_eq!(ctx.adapter.connect_count("b1"), 1);
}

#[tokio::test]
async fn concurrent_starts_register_once() {
    let ctx = setup([bot_record("b1")]);

    let id = bot("b1");
    let (a, b) = tokio::join!(ctx.manager.start(&id), ctx.manager.start(&id));

    assert_ok(&a);
    assert_ok(&b);
    assert_eq!(ctx.manager.statuses().len(), 1);
    assert_eq!(ctx.adapter.connect_count("b1"), 1);
}

#[tokio::test]
async fn start_eventually_reports_connected() {
    let mut ctx = setup([bot_record("b1")]);
    let mut rx = ctx.manager.subscribe(&bot("b1"));

    ctx.manager.start(&bot("b1")).await;
    assert!(!ctx.manager.status(&bot("b1")).connected);

    ctx.adapter.emit_connected("b1").await;
    ctx.pump().await;

    let status = ctx.manager.status(&bot("b1"));
    assert!(status.running);
    assert!(status.connected);
    assert_eq!(status.attempt, 0);

    let record = ctx.store.get("b1").unwrap();
    assert_eq!(record.status, BotStatus::Online);
    assert!(record.last_online_at_ms.is_some());

    let generation = ctx.generation("b1");
    assert_eq!(
        received(&mut rx),
        vec![BotEvent::Connected {
            bot_id: bot("b1"),
            generation
        }]
    );
}

#[tokio::test]
async fn connect_error_reports_failure_and_schedules_retry() {
    let mut ctx = setup([bot_record("b1")]);
    ctx.adapter
        .set_connect_error(ConnectionError::ConnectFailed("refused".to_string()));

    let result = ctx.manager.start(&bot("b1")).await;

    assert!(result.is_kind(ErrorKind::Underlying));
    assert!(result.message.contains("refused"));
    assert_eq!(ctx.state("b1"), Some(ConnectionState::Reconnecting));
    assert_eq!(ctx.manager.status(&bot("b1")).attempt, 1);
    assert_eq!(ctx.stored_status("b1"), BotStatus::Reconnecting);

    ctx.advance(Duration::from_secs(5)).await;
    assert_eq!(ctx.adapter.connect_count("b1"), 2);
    assert_eq!(ctx.state("b1"), Some(ConnectionState::Connecting));
}

#[tokio::test]
async fn connect_error_without_reconnect_drops_bot() {
    let ctx = setup([no_reconnect_record("b1")]);
    ctx.adapter
        .set_connect_error(ConnectionError::ConnectFailed("refused".to_string()));

    let result = ctx.manager.start(&bot("b1")).await;

    assert!(!result.success);
    assert!(!ctx.manager.status(&bot("b1")).running);
    let record = ctx.store.get("b1").unwrap();
    assert_eq!(record.status, BotStatus::Error);
    assert_eq!(record.last_error.as_deref(), Some("connect failed: refused"));
}

#[tokio::test]
async fn store_write_failure_does_not_fail_start() {
    let ctx = setup([bot_record("b1")]);
    ctx.store.set_unavailable(true);

    let result = ctx.manager.start(&bot("b1")).await;

    assert_ok(&result);
    assert_eq!(ctx.state("b1"), Some(ConnectionState::Connecting));
    assert_eq!(ctx.stored_status("b1"), BotStatus::Offline);
}

#[tokio::test]
async fn handshake_timeout_takes_failure_path() {
    let mut ctx = setup([bot_record("b1")]);
    let mut rx = ctx.manager.subscribe(&bot("b1"));
    ctx.manager.start(&bot("b1")).await;
    let first = ctx.generation("b1");

    ctx.advance(Duration::from_secs(29)).await;
    assert_eq!(ctx.state("b1"), Some(ConnectionState::Connecting));

    ctx.advance(Duration::from_secs(1)).await;
    assert_eq!(ctx.state("b1"), Some(ConnectionState::Reconnecting));
    assert!(ctx
        .adapter
        .calls()
        .contains(&ConnectionCall::Disconnect {
            bot_id: bot("b1"),
            generation: first
        }));

    let events = received(&mut rx);
    assert!(matches!(
        &events[0],
        BotEvent::Error { message, .. } if message == "handshake timed out after 30000ms"
    ));
    assert!(matches!(events[1], BotEvent::Reconnecting { attempt: 1, .. }));
}

#[tokio::test]
async fn connected_handshake_cancels_timeout() {
    let mut ctx = setup([bot_record("b1")]);
    ctx.start_connected("b1").await;

    ctx.advance(Duration::from_secs(60)).await;

    assert_eq!(ctx.state("b1"), Some(ConnectionState::Connected));
    assert_eq!(ctx.adapter.connect_count("b1"), 1);
}
