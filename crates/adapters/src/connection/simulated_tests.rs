// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mcb_core::test_support::bot_record;
use mcb_core::SequentialIdGen;
use tokio::time::Instant;

fn adapter(config: SimulationConfig) -> SimulatedAdapter<SequentialIdGen> {
    SimulatedAdapter::with_id_gen(config, SequentialIdGen::new("sim"))
}

fn spec(id: &str, generation: u64) -> ConnectSpec {
    ConnectSpec::from_record(&bot_record(id), generation)
}

async fn connect(
    adapter: &SimulatedAdapter<SequentialIdGen>,
    spec: ConnectSpec,
) -> (ConnectionHandle, mpsc::Receiver<BotEvent>) {
    let (tx, rx) = mpsc::channel(16);
    let handle = adapter.connect(spec, tx).await.unwrap();
    (handle, rx)
}

#[tokio::test(start_paused = true)]
async fn connected_after_handshake_delay() {
    let adapter = adapter(SimulationConfig::default());
    let started = Instant::now();
    let (handle, mut rx) = connect(&adapter, spec("b1", 3)).await;
    assert_eq!(handle.session_id, "sim-1");
    assert_eq!(handle.generation, 3);

    let event = rx.recv().await.unwrap();
    assert_eq!(
        event,
        BotEvent::Connected {
            bot_id: "b1".into(),
            generation: 3
        }
    );
    assert!(started.elapsed() >= Duration::from_secs(2));

    let greeting = rx.recv().await.unwrap();
    assert!(matches!(greeting, BotEvent::Log { ref line, .. } if line.contains("joined")));
}

#[tokio::test(start_paused = true)]
async fn failed_handshake_reports_error_and_forgets_session() {
    let adapter = adapter(SimulationConfig {
        connect_failure_rate: 1.0,
        ..SimulationConfig::default()
    });
    let (handle, mut rx) = connect(&adapter, spec("b1", 1)).await;

    let event = rx.recv().await.unwrap();
    assert!(matches!(event, BotEvent::Error { generation: 1, .. }));
    assert_eq!(adapter.session_count(), 0);
    assert!(matches!(
        adapter.disconnect(&handle).await,
        Err(ConnectionError::NotFound(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn send_before_handshake_is_not_ready() {
    let adapter = adapter(SimulationConfig::default());
    let (handle, _rx) = connect(&adapter, spec("b1", 1)).await;

    let err = adapter.send(&handle, &Command::Jump).await.unwrap_err();
    assert!(matches!(err, ConnectionError::NotReady(_)));
}

#[tokio::test(start_paused = true)]
async fn chat_is_echoed_as_log() {
    let adapter = adapter(SimulationConfig::default());
    let (handle, mut rx) = connect(&adapter, spec("b1", 1)).await;
    rx.recv().await.unwrap(); // connected
    rx.recv().await.unwrap(); // greeting

    let reply = adapter
        .send(
            &handle,
            &Command::Chat {
                message: "hello".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(reply.message, "Message sent");
    assert_eq!(reply.data["chat"], "<b1-name> hello");

    let echo = rx.recv().await.unwrap();
    assert!(matches!(echo, BotEvent::Log { ref line, .. } if line == "<b1-name> hello"));
}

#[tokio::test(start_paused = true)]
async fn move_updates_position_reported_by_status() {
    let adapter = adapter(SimulationConfig::default());
    let (handle, mut rx) = connect(&adapter, spec("b1", 1)).await;
    rx.recv().await.unwrap();

    let reply = adapter
        .send(
            &handle,
            &Command::Move {
                direction: Direction::Right,
                duration_ms: 2000,
            },
        )
        .await
        .unwrap();
    assert_eq!(reply.message, "Moved right for 2000ms");

    let status = adapter.send(&handle, &Command::Status).await.unwrap();
    let x = status.data["position"]["x"].as_f64().unwrap();
    assert!((x - (0.5 + 2.0 * WALK_SPEED)).abs() < 1e-9);
    assert_eq!(status.data["health"], 20);
    assert_eq!(status.data["server"], "127.0.0.1:25565");
}

#[tokio::test(start_paused = true)]
async fn network_drop_reports_disconnect() {
    let adapter = adapter(SimulationConfig {
        drop_rate: 1.0,
        activity_interval: Duration::from_secs(5),
        ..SimulationConfig::default()
    });
    let (_handle, mut rx) = connect(&adapter, spec("b1", 2)).await;
    rx.recv().await.unwrap(); // connected
    rx.recv().await.unwrap(); // greeting

    let event = rx.recv().await.unwrap();
    assert!(matches!(event, BotEvent::Disconnected { generation: 2, .. }));
    assert_eq!(adapter.session_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn anti_afk_jumps_periodically() {
    let adapter = adapter(SimulationConfig {
        anti_afk_interval: Duration::from_secs(10),
        ..SimulationConfig::default()
    });
    let mut spec = spec("b1", 1);
    spec.anti_afk = true;
    let (_handle, mut rx) = connect(&adapter, spec).await;
    rx.recv().await.unwrap(); // connected
    rx.recv().await.unwrap(); // greeting

    for _ in 0..2 {
        let event = rx.recv().await.unwrap();
        assert!(matches!(event, BotEvent::Log { ref line, .. } if line == "anti-afk: jumped"));
    }
}

#[tokio::test(start_paused = true)]
async fn disconnect_stops_session_silently() {
    let adapter = adapter(SimulationConfig::default());
    let (handle, mut rx) = connect(&adapter, spec("b1", 1)).await;
    adapter.disconnect(&handle).await.unwrap();
    assert_eq!(adapter.session_count(), 0);

    // Task aborted: the channel closes without a Connected event
    assert!(rx.recv().await.is_none());
}

#[tokio::test]
async fn empty_host_fails_immediately() {
    let adapter = adapter(SimulationConfig::default());
    let mut spec = spec("b1", 1);
    spec.server.host = "  ".to_string();
    let (tx, _rx) = mpsc::channel(1);
    let err = adapter.connect(spec, tx).await.unwrap_err();
    assert!(matches!(err, ConnectionError::ConnectFailed(_)));
}
