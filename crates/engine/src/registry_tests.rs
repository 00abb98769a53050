// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mcb_core::test_support::bot_record;

#[test]
fn insert_connecting_is_check_then_insert() {
    let mut registry = Registry::new();

    assert_eq!(registry.insert_connecting(bot_record("b1"), 10), Some(1));
    assert_eq!(registry.insert_connecting(bot_record("b1"), 20), None);
    assert_eq!(registry.len(), 1);

    let entry = registry.get("b1").unwrap();
    assert_eq!(entry.state, ConnectionState::Connecting);
    assert_eq!(entry.last_activity_ms, 10);
    assert!(entry.handle.is_none());
}

#[test]
fn generations_never_repeat_after_removal() {
    let mut registry = Registry::new();

    let first = registry.insert_connecting(bot_record("b1"), 0).unwrap();
    registry.remove("b1");
    let second = registry.insert_connecting(bot_record("b1"), 0).unwrap();

    assert!(second > first);
}

#[test]
fn current_mut_filters_stale_generation() {
    let mut registry = Registry::new();
    let generation = registry.insert_connecting(bot_record("b1"), 0).unwrap();

    assert!(registry.current_mut("b1", generation).is_some());
    assert!(registry.current_mut("b1", generation + 1).is_none());
    assert!(registry.current_mut("b2", generation).is_none());
}

#[test]
fn snapshot_reports_connected_only_in_connected_state() {
    let mut registry = Registry::new();
    registry.insert_connecting(bot_record("b1"), 5).unwrap();

    let snap = registry.get("b1").unwrap().snapshot();
    assert!(snap.running);
    assert!(!snap.connected);
    assert_eq!(snap.state, Some(ConnectionState::Connecting));

    registry.get_mut("b1").unwrap().state = ConnectionState::Connected;
    assert!(registry.get("b1").unwrap().snapshot().connected);
}

#[test]
fn snapshots_are_sorted_and_drain_empties() {
    let mut registry = Registry::new();
    for id in ["c", "a", "b"] {
        registry.insert_connecting(bot_record(id), 0);
    }

    let ids: Vec<_> = registry
        .snapshots()
        .into_iter()
        .map(|s| s.bot_id.to_string())
        .collect();
    assert_eq!(ids, vec!["a", "b", "c"]);

    assert_eq!(registry.drain().len(), 3);
    assert!(registry.is_empty());
}

#[test]
fn lookups_accept_bot_id_and_str() {
    let mut registry = Registry::new();
    let id = BotId::new("b1");
    let generation = registry.insert_connecting(bot_record("b1"), 0).unwrap();

    assert!(registry.contains(&id));
    assert!(registry.contains("b1"));
    assert!(registry.get(&id).is_some());
    assert!(registry.current_mut(&id, generation).is_some());
    assert!(registry.get_mut(&id).is_some());
    assert!(registry.remove(&id).is_some());
    assert!(!registry.contains("b1"));
}
