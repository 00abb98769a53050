// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use crate::listener::tests::harness;
use crate::protocol::{Request, Response};
use mcb_core::test_support::bot_record;
use mcb_core::{BotEvent, BotId, ErrorKind, OpResult};

fn result_of(response: Response) -> OpResult {
    match response {
        Response::Result { result } => result,
        other => panic!("expected Result, got {other:?}"),
    }
}

#[tokio::test]
async fn register_stores_record() {
    let h = harness([]);
    let result = result_of(
        h.request(Request::Register {
            record: bot_record("bot-1"),
        })
        .await,
    );
    assert!(result.success, "{result:?}");
    assert_eq!(h.store.get("bot-1"), Some(bot_record("bot-1")));
}

#[tokio::test]
async fn register_replaces_existing_record() {
    let h = harness([bot_record("bot-1")]);
    let mut record = bot_record("bot-1");
    record.name = "renamed".to_string();

    let result = result_of(h.request(Request::Register { record }).await);
    assert!(result.success);
    assert_eq!(h.store.len(), 1);
    assert_eq!(h.store.get("bot-1").map(|r| r.name), Some("renamed".to_string()));
}

#[tokio::test]
async fn register_rejects_blank_name() {
    let h = harness([]);
    let mut record = bot_record("bot-1");
    record.name = "  ".to_string();

    let result = result_of(h.request(Request::Register { record }).await);
    assert!(result.is_kind(ErrorKind::InvalidParams));
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn register_reports_store_failure() {
    let h = harness([]);
    h.store.set_unavailable(true);

    let result = result_of(
        h.request(Request::Register {
            record: bot_record("bot-1"),
        })
        .await,
    );
    assert!(result.is_kind(ErrorKind::Underlying), "{result:?}");
}

#[tokio::test]
async fn delete_running_bot_disconnects_and_removes_record() {
    let mut h = harness([bot_record("bot-1")]);
    let bot_id = BotId::new("bot-1");
    let mut events = h.ctx.manager.subscribe(&bot_id);
    h.request(Request::Start {
        bot_id: bot_id.clone(),
    })
    .await;
    h.adapter.emit_connected("bot-1").await;
    h.pump().await;
    while events.try_recv().is_ok() {}

    let result = result_of(
        h.request(Request::Delete {
            bot_id: bot_id.clone(),
        })
        .await,
    );

    assert!(result.success, "{result:?}");
    assert!(h.store.get("bot-1").is_none());
    assert!(!h.ctx.manager.status(&bot_id).running);
    assert!(matches!(
        events.try_recv(),
        Ok(BotEvent::Disconnected { reason, .. }) if reason == "deleted"
    ));
}

#[tokio::test]
async fn delete_stopped_bot_removes_record() {
    let h = harness([bot_record("bot-1")]);
    let result = result_of(
        h.request(Request::Delete {
            bot_id: BotId::new("bot-1"),
        })
        .await,
    );
    assert!(result.success);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn delete_unknown_bot_is_not_found() {
    let h = harness([]);
    let result = result_of(
        h.request(Request::Delete {
            bot_id: BotId::new("ghost"),
        })
        .await,
    );
    assert!(result.is_kind(ErrorKind::NotFound));
}
