// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

#[test]
fn ok_result_serializes_minimal() {
    let result = OpResult::ok("Bot started");
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({ "success": true, "message": "Bot started" })
    );
}

#[test]
fn failure_carries_kind() {
    let result = OpResult::not_running();
    assert!(!result.success);
    assert!(result.is_kind(ErrorKind::NotRunning));
    assert_eq!(
        serde_json::to_value(&result).unwrap()["error"],
        json!("not_running")
    );
}

#[test]
fn data_is_attached() {
    let result = OpResult::ok("status").with_data(json!({ "health": 20 }));
    assert_eq!(result.data["health"], 20);
}

#[yare::parameterized(
    not_found      = { ErrorKind::NotFound, "not found" },
    not_connected  = { ErrorKind::NotConnected, "not connected" },
    unknown        = { ErrorKind::UnknownCommand, "unknown command" },
    underlying     = { ErrorKind::Underlying, "underlying error" },
)]
fn kind_display(kind: ErrorKind, expected: &str) {
    assert_eq!(kind.to_string(), expected);
}
