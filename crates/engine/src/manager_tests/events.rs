// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Log relay, subscriptions and the boot sweep

use super::*;
use mcb_core::test_support::{active_record, bot_record, log_event, logging_record};

#[tokio::test]
async fn log_lines_relayed_only_when_logging_enabled() {
    let mut ctx = setup([bot_record("quiet"), logging_record("loud")]);
    ctx.start_connected("quiet").await;
    ctx.start_connected("loud").await;
    let mut quiet_rx = ctx.manager.subscribe(&bot("quiet"));
    let mut loud_rx = ctx.manager.subscribe(&bot("loud"));

    ctx.adapter.emit_log("quiet", "<Alex> hello").await;
    ctx.adapter.emit_log("loud", "<Alex> hello").await;
    ctx.pump().await;

    assert!(received(&mut quiet_rx).is_empty());
    let generation = ctx.generation("loud");
    assert_eq!(
        received(&mut loud_rx),
        vec![log_event("loud", generation, "<Alex> hello")]
    );
}

#[tokio::test]
async fn log_lines_update_last_activity() {
    let mut ctx = setup([bot_record("b1")]);
    ctx.start_connected("b1").await;
    let before = ctx.manager.status(&bot("b1")).last_activity_ms.unwrap();

    ctx.clock.advance(Duration::from_secs(10));
    ctx.adapter.emit_log("b1", "anti-afk: jumped").await;
    ctx.pump().await;

    assert_eq!(
        ctx.manager.status(&bot("b1")).last_activity_ms,
        Some(before + 10_000)
    );
}

#[tokio::test]
async fn stale_log_is_ignored() {
    let mut ctx = setup([logging_record("b1")]);
    ctx.start_connected("b1").await;
    let old = ctx.generation("b1");
    ctx.manager.reconnect(&bot("b1")).await;
    let mut rx = ctx.manager.subscribe(&bot("b1"));

    ctx.manager.handle_event(log_event("b1", old, "late")).await;

    assert!(received(&mut rx).is_empty());
}

#[tokio::test]
async fn late_subscriber_misses_earlier_events() {
    let mut ctx = setup([bot_record("b1")]);
    let mut early = ctx.manager.subscribe(&bot("b1"));
    ctx.start_connected("b1").await;

    let mut late = ctx.manager.subscribe(&bot("b1"));
    assert_eq!(received(&mut early).len(), 1);
    assert!(received(&mut late).is_empty());

    ctx.manager.stop(&bot("b1"), true).await;
    assert_eq!(received(&mut late).len(), 1);
}

#[tokio::test]
async fn statuses_lists_running_bots_in_order() {
    let mut ctx = setup([bot_record("b2"), bot_record("b1"), bot_record("b3")]);
    ctx.start_connected("b2").await;
    ctx.manager.start(&bot("b1")).await;

    let statuses = ctx.manager.statuses();

    let summary: Vec<_> = statuses
        .iter()
        .map(|s| (s.bot_id.as_str(), s.connected))
        .collect();
    assert_eq!(summary, vec![("b1", false), ("b2", true)]);
    assert!(!ctx.manager.status(&bot("b3")).running);
}

#[tokio::test]
async fn boot_sweep_starts_exactly_active_records() {
    let ctx = setup([
        active_record("a1"),
        bot_record("idle"),
        active_record("a2"),
    ]);

    let results = ctx.manager.start_active().await;

    let started: Vec<_> = results.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(started, vec!["a1", "a2"]);
    assert!(results.iter().all(|(_, r)| r.success));
    assert_eq!(ctx.adapter.connect_count("a1"), 1);
    assert_eq!(ctx.adapter.connect_count("a2"), 1);
    assert_eq!(ctx.adapter.connect_count("idle"), 0);
    assert!(!ctx.manager.status(&bot("idle")).running);
}

#[tokio::test]
async fn boot_sweep_skips_bots_already_running() {
    let mut ctx = setup([active_record("a1")]);
    ctx.start_connected("a1").await;

    let results = ctx.manager.start_active().await;

    assert_eq!(results[0].1.message, "Bot is already running");
    assert_eq!(ctx.adapter.connect_count("a1"), 1);
}

#[tokio::test]
async fn manager_events_are_relayed_verbatim() {
    let ctx = setup([bot_record("b1")]);
    let mut rx = ctx.manager.subscribe(&bot("b1"));
    let event = BotEvent::GaveUp {
        bot_id: bot("b1"),
        attempts: 4,
    };

    ctx.manager.handle_event(event.clone()).await;

    assert_eq!(received(&mut rx), vec![event]);
}
