// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serde_json::json;

fn bot() -> BotId {
    BotId::new("bot-1")
}

#[test]
fn connected_serializes_with_type_tag() {
    let event = BotEvent::Connected {
        bot_id: bot(),
        generation: 2,
    };
    assert_eq!(
        serde_json::to_value(&event).unwrap(),
        json!({ "type": "bot:connected", "bot_id": "bot-1", "generation": 2 })
    );
}

#[test]
fn disconnected_deserializes_from_tagged_json() {
    let event: BotEvent = serde_json::from_value(json!({
        "type": "bot:disconnected",
        "bot_id": "bot-1",
        "generation": 4,
        "reason": "kicked",
    }))
    .unwrap();
    assert_eq!(
        event,
        BotEvent::Disconnected {
            bot_id: bot(),
            generation: 4,
            reason: "kicked".to_string(),
        }
    );
}

#[test]
fn manager_events_have_no_generation() {
    let events = [
        BotEvent::Reconnecting {
            bot_id: bot(),
            attempt: 1,
            delay_ms: 5000,
        },
        BotEvent::GaveUp {
            bot_id: bot(),
            attempts: 3,
        },
    ];
    for event in events {
        assert_eq!(event.generation(), None, "{}", event.name());
        assert_eq!(event.bot_id(), &bot());
    }
}

#[test]
fn adapter_events_carry_generation() {
    let event = BotEvent::Log {
        bot_id: bot(),
        generation: 9,
        line: "<Steve> hi".to_string(),
    };
    assert_eq!(event.generation(), Some(9));
    assert_eq!(event.name(), "log");
}

#[yare::parameterized(
    connected = {
        BotEvent::Connected { bot_id: BotId::new("b"), generation: 1 },
        "connect bot=b gen=1"
    },
    error = {
        BotEvent::Error { bot_id: BotId::new("b"), generation: 2, message: "refused".into() },
        "error bot=b gen=2 error=refused"
    },
    log_hides_content = {
        BotEvent::Log { bot_id: BotId::new("b"), generation: 1, line: "secret".into() },
        "log bot=b gen=1 len=6"
    },
    gave_up = {
        BotEvent::GaveUp { bot_id: BotId::new("b"), attempts: 5 },
        "gave_up bot=b attempts=5"
    },
)]
fn log_summary(event: BotEvent, expected: &str) {
    assert_eq!(event.log_summary(), expected);
}
