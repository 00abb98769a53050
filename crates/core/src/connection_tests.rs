// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use ConnectionState::*;

#[yare::parameterized(
    handshake_done       = { Connecting, Connected, true },
    handshake_failed     = { Connecting, Reconnecting, true },
    stopped_connecting   = { Connecting, Disconnected, true },
    dropped              = { Connected, Reconnecting, true },
    stopped              = { Connected, Disconnected, true },
    retry                = { Reconnecting, Connecting, true },
    stopped_waiting      = { Reconnecting, Disconnected, true },
    skip_handshake       = { Reconnecting, Connected, false },
    connected_again      = { Connected, Connecting, false },
    revive_disconnected  = { Disconnected, Connecting, false },
    self_loop            = { Connected, Connected, false },
)]
fn transitions(from: ConnectionState, to: ConnectionState, allowed: bool) {
    assert_eq!(from.can_transition_to(to), allowed);
}

#[yare::parameterized(
    connecting   = { Connecting, BotStatus::Connecting },
    connected    = { Connected, BotStatus::Online },
    disconnected = { Disconnected, BotStatus::Offline },
    reconnecting = { Reconnecting, BotStatus::Reconnecting },
)]
fn persisted_status(state: ConnectionState, status: BotStatus) {
    assert_eq!(state.as_status(), status);
}

#[test]
fn not_running_snapshot_has_no_state() {
    let snapshot = StatusSnapshot::not_running(BotId::new("b"));
    assert!(!snapshot.running);
    assert!(!snapshot.connected);
    assert!(snapshot.state.is_none());

    let json = serde_json::to_value(&snapshot).unwrap();
    assert!(json.get("state").is_none());
    assert_eq!(json["running"], false);
}
