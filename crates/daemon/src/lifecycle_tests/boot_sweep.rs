// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use mcb_core::test_support::bot_record;
use mcb_core::ConnectionState;

#[tokio::test]
async fn boot_sweep_starts_only_active_bots() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    seed_store(
        &config,
        [active_record("bot-1"), bot_record("bot-2"), active_record("bot-3")],
    )
    .await;

    let result = startup(&config).await.unwrap();
    let manager = &result.daemon.manager;
    let started = boot_sweep(manager).await;

    assert_eq!(started, 2);
    let running: Vec<_> = manager
        .statuses()
        .into_iter()
        .map(|s| s.bot_id.to_string())
        .collect();
    assert_eq!(running, vec!["bot-1", "bot-3"]);
    assert_eq!(
        manager.status(&BotId::new("bot-1")).state,
        Some(ConnectionState::Connecting)
    );
}

#[tokio::test]
async fn boot_sweep_with_empty_store_starts_nothing() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());

    let result = startup(&config).await.unwrap();
    assert_eq!(boot_sweep(&result.daemon.manager).await, 0);
}
