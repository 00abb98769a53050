// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command dispatch

use super::*;
use mcb_adapters::ConnectionError;
use mcb_core::test_support::bot_record;
use mcb_core::{Command, Direction, ErrorKind};
use serde_json::json;

#[tokio::test]
async fn command_to_stopped_bot_is_not_running() {
    let ctx = setup([bot_record("b1")]);

    let result = ctx
        .manager
        .send_command(&bot("b1"), "chat", &json!({ "message": "hi" }))
        .await;

    assert!(result.is_kind(ErrorKind::NotRunning));
}

#[tokio::test]
async fn command_to_connecting_bot_never_reaches_adapter() {
    let ctx = setup([bot_record("b1")]);
    ctx.manager.start(&bot("b1")).await;

    let result = ctx.manager.send_command(&bot("b1"), "jump", &json!({})).await;

    assert!(result.is_kind(ErrorKind::NotConnected));
    assert_eq!(ctx.adapter.send_count("b1"), 0);
}

#[tokio::test]
async fn command_to_reconnecting_bot_is_not_connected() {
    let mut ctx = setup([bot_record("b1")]);
    ctx.start_connected("b1").await;
    ctx.manager.stop(&bot("b1"), false).await;

    let result = ctx.manager.send_command(&bot("b1"), "jump", &json!({})).await;

    assert!(result.is_kind(ErrorKind::NotConnected));
    assert_eq!(ctx.adapter.send_count("b1"), 0);
}

#[tokio::test]
async fn connected_bot_dispatches_parsed_command() {
    let mut ctx = setup([bot_record("b1")]);
    ctx.start_connected("b1").await;
    let before = ctx.manager.status(&bot("b1")).last_activity_ms;
    ctx.clock.advance(Duration::from_secs(3));

    let result = ctx
        .manager
        .send_command(
            &bot("b1"),
            "move",
            &json!({ "direction": "left", "duration_ms": 250 }),
        )
        .await;

    assert_ok(&result);
    assert_eq!(result.message, "move ok");
    assert_eq!(
        ctx.adapter.calls().last(),
        Some(&ConnectionCall::Send {
            bot_id: bot("b1"),
            command: Command::Move {
                direction: Direction::Left,
                duration_ms: 250
            }
        })
    );
    let after = ctx.manager.status(&bot("b1")).last_activity_ms;
    assert_eq!(after, before.map(|ms| ms + 3000));
}

#[tokio::test]
async fn rejected_commands_never_reach_adapter() {
    let cases = [
        ("dance", json!({}), ErrorKind::UnknownCommand),
        ("chat", json!({ "message": "  " }), ErrorKind::InvalidParams),
        ("move", json!({ "direction": "up" }), ErrorKind::InvalidParams),
        ("move", json!({ "direction": "back", "duration_ms": 0 }), ErrorKind::InvalidParams),
    ];
    let mut ctx = setup([bot_record("b1")]);
    ctx.start_connected("b1").await;

    for (name, params, kind) in cases {
        let result = ctx.manager.send_command(&bot("b1"), name, &params).await;
        assert!(result.is_kind(kind), "{name}: {result:?}");
    }
    assert_eq!(ctx.adapter.send_count("b1"), 0);
}

#[tokio::test]
async fn adapter_send_error_is_underlying() {
    let mut ctx = setup([bot_record("b1")]);
    ctx.start_connected("b1").await;
    ctx.adapter
        .set_send_error(ConnectionError::SendFailed("broken pipe".to_string()));

    let result = ctx.manager.send_command(&bot("b1"), "jump", &json!({})).await;

    assert!(result.is_kind(ErrorKind::Underlying));
    assert!(result.message.contains("broken pipe"));
    assert!(ctx.manager.status(&bot("b1")).connected);
}
