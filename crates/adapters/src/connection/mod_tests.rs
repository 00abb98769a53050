// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mcb_core::test_support::bot_record;

#[yare::parameterized(
    not_found = { ConnectionError::NotFound("b1".into()), "session not found: b1" },
    connect_failed = { ConnectionError::ConnectFailed("refused".into()), "connect failed: refused" },
    not_ready = { ConnectionError::NotReady("b1".into()), "session not ready: b1" },
    send_failed = { ConnectionError::SendFailed("closed".into()), "send failed: closed" },
)]
fn connection_error_display(error: ConnectionError, expected: &str) {
    assert_eq!(error.to_string(), expected);
}

#[test]
fn connect_spec_copies_record_fields() {
    let mut record = bot_record("b1");
    record.version = Some("1.20.4".to_string());
    record.flags.anti_afk = true;

    let spec = ConnectSpec::from_record(&record, 7);

    assert_eq!(spec.bot_id, record.id);
    assert_eq!(spec.generation, 7);
    assert_eq!(spec.username, record.name);
    assert_eq!(spec.server, record.server);
    assert_eq!(spec.version.as_deref(), Some("1.20.4"));
    assert!(spec.anti_afk);
}
