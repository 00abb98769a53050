// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

fn record() -> BotRecord {
    BotRecord::new("bot-1", "owner-1", "Steve", ServerAddress::new("mc.local", 25565))
}

#[test]
fn new_record_is_inactive_and_offline() {
    let record = record();
    assert!(!record.active);
    assert_eq!(record.status, BotStatus::Offline);
    assert!(record.reconnect.enabled);
    assert_eq!(record.reconnect.delay_ms, DEFAULT_RECONNECT_DELAY_MS);
}

#[test]
fn minimal_json_fills_defaults() {
    let json = r#"{
        "id": "b1",
        "owner": "o1",
        "name": "Alex",
        "server": { "host": "play.example.net" }
    }"#;
    let record: BotRecord = serde_json::from_str(json).unwrap();
    assert_eq!(record.server.port, DEFAULT_PORT);
    assert_eq!(record.auth, AuthMode::Offline);
    assert_eq!(record.flags, BotFlags::default());
    assert_eq!(record.status, BotStatus::Offline);
    assert!(record.version.is_none());
}

#[test]
fn server_address_displays_host_and_port() {
    assert_eq!(ServerAddress::new("h", 1234).to_string(), "h:1234");
}

#[test]
fn apply_online_records_time_and_clears_error() {
    let mut record = record();
    record.last_error = Some("timed out".to_string());

    record.apply(&StatusUpdate::new(BotStatus::Online, 1000).active(true));

    assert_eq!(record.status, BotStatus::Online);
    assert!(record.active);
    assert_eq!(record.last_online_at_ms, Some(1000));
    assert!(record.last_error.is_none());
    assert_eq!(record.updated_at_ms, 1000);
}

#[test]
fn apply_error_keeps_last_online() {
    let mut record = record();
    record.apply(&StatusUpdate::new(BotStatus::Online, 1000));
    record.apply(&StatusUpdate::new(BotStatus::Error, 2000).error("refused"));

    assert_eq!(record.status, BotStatus::Error);
    assert_eq!(record.last_online_at_ms, Some(1000));
    assert_eq!(record.last_error.as_deref(), Some("refused"));
    assert_eq!(record.updated_at_ms, 2000);
}

#[test]
fn apply_without_active_keeps_intent() {
    let mut record = record();
    record.active = true;
    record.apply(&StatusUpdate::new(BotStatus::Reconnecting, 5));
    assert!(record.active);
}

#[test]
fn status_serializes_snake_case() {
    assert_eq!(
        serde_json::to_string(&BotStatus::Reconnecting).unwrap(),
        "\"reconnecting\""
    );
    assert_eq!(BotStatus::Online.to_string(), "online");
}
