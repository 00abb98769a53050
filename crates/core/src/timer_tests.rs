// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn reconnect_timer_round_trips() {
    let bot = BotId::new("bot-1");
    let id = TimerId::reconnect(&bot, 7);
    assert_eq!(id, "reconnect:7:bot-1");
    assert_eq!(
        id.kind(),
        Some(TimerKind::Reconnect {
            bot_id: bot,
            generation: 7
        })
    );
}

#[test]
fn handshake_timer_round_trips() {
    let bot = BotId::new("bot-2");
    let id = TimerId::handshake(&bot, 3);
    assert_eq!(
        id.kind(),
        Some(TimerKind::HandshakeTimeout {
            bot_id: bot,
            generation: 3
        })
    );
}

#[test]
fn bot_ids_with_colons_survive() {
    let bot = BotId::new("owner:bot:9");
    let id = TimerId::reconnect(&bot, 1);
    assert!(id.is_for(&bot));
    assert_eq!(
        id.kind(),
        Some(TimerKind::Reconnect {
            bot_id: bot,
            generation: 1
        })
    );
}

#[test]
fn is_for_matches_exact_bot_only() {
    let id = TimerId::reconnect(&BotId::new("bot-1"), 1);
    assert!(id.is_for(&BotId::new("bot-1")));
    assert!(!id.is_for(&BotId::new("bot-10")));
    assert!(!id.is_for(&BotId::new("bot")));
}

#[yare::parameterized(
    unknown_prefix   = { "cron:1:bot" },
    missing_id       = { "reconnect:1" },
    bad_generation   = { "reconnect:x:bot" },
    empty            = { "" },
)]
fn malformed_ids_have_no_kind(raw: &str) {
    assert_eq!(TimerId::from(raw).kind(), None);
}
