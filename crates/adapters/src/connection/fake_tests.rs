// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mcb_core::test_support::bot_record;

async fn connect(
    adapter: &FakeConnectionAdapter,
    id: &str,
    generation: u64,
) -> (ConnectionHandle, mpsc::Receiver<BotEvent>) {
    let (tx, rx) = mpsc::channel(8);
    let handle = adapter
        .connect(ConnectSpec::from_record(&bot_record(id), generation), tx)
        .await
        .unwrap();
    (handle, rx)
}

#[tokio::test]
async fn fake_records_connect_and_tracks_generation() {
    let adapter = FakeConnectionAdapter::new();
    let (handle, _rx) = connect(&adapter, "b1", 4).await;

    assert_eq!(handle.session_id, "fake-1");
    assert_eq!(adapter.generation("b1"), Some(4));
    assert_eq!(adapter.connect_count("b1"), 1);
    assert_eq!(
        adapter.calls(),
        vec![ConnectionCall::Connect {
            bot_id: "b1".into(),
            generation: 4
        }]
    );
}

#[tokio::test]
async fn fake_emits_with_latest_generation() {
    let adapter = FakeConnectionAdapter::new();
    let (_h1, _rx1) = connect(&adapter, "b1", 1).await;
    let (_h2, mut rx2) = connect(&adapter, "b1", 2).await;

    adapter.emit_connected("b1").await;
    assert_eq!(
        rx2.recv().await.unwrap(),
        BotEvent::Connected {
            bot_id: "b1".into(),
            generation: 2
        }
    );
}

#[tokio::test]
async fn fake_connect_error_is_one_shot() {
    let adapter = FakeConnectionAdapter::new();
    adapter.set_connect_error(ConnectionError::ConnectFailed("refused".to_string()));

    let (tx, _rx) = mpsc::channel(1);
    let spec = ConnectSpec::from_record(&bot_record("b1"), 1);
    assert!(adapter.connect(spec.clone(), tx.clone()).await.is_err());
    assert!(adapter.connect(spec, tx).await.is_ok());
    assert_eq!(adapter.connect_count("b1"), 2);
}

#[tokio::test]
async fn fake_send_after_disconnect_fails() {
    let adapter = FakeConnectionAdapter::new();
    let (handle, _rx) = connect(&adapter, "b1", 1).await;

    assert_eq!(
        adapter.send(&handle, &Command::Jump).await.unwrap().message,
        "jump ok"
    );
    adapter.disconnect(&handle).await.unwrap();
    assert!(matches!(
        adapter.send(&handle, &Command::Jump).await,
        Err(ConnectionError::NotFound(_))
    ));
    assert_eq!(adapter.send_count("b1"), 2);
}

#[tokio::test]
async fn fake_stale_disconnect_keeps_newer_session() {
    let adapter = FakeConnectionAdapter::new();
    let (old, _rx1) = connect(&adapter, "b1", 1).await;
    let (_new, _rx2) = connect(&adapter, "b1", 2).await;

    adapter.disconnect(&old).await.unwrap();
    assert_eq!(adapter.generation("b1"), Some(2));
}

#[tokio::test]
async fn fake_emit_for_unknown_bot_is_ignored() {
    let adapter = FakeConnectionAdapter::new();
    adapter.emit_log("ghost", "boo").await;
    assert!(adapter.calls().is_empty());
}
