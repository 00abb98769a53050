// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fs2::FileExt;

#[tokio::test]
async fn startup_binds_socket_and_writes_pid() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());

    let result = startup(&config).await.unwrap();

    assert!(config.socket_path.exists());
    let pid = std::fs::read_to_string(&config.lock_path).unwrap();
    assert_eq!(pid.trim(), std::process::id().to_string());
    assert!(result.daemon.manager.statuses().is_empty());
}

#[tokio::test]
async fn startup_replaces_stale_socket() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    std::fs::write(&config.socket_path, b"").unwrap();

    let _result = startup(&config).await.unwrap();
    assert!(config.socket_path.exists());
}

#[tokio::test]
async fn startup_lock_failed_does_not_remove_existing_files() {
    // Simulate a running daemon by holding the lock and creating its files.
    // A second startup attempt must fail without deleting anything.
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());

    std::fs::write(&config.socket_path, b"").unwrap();
    let lock_file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(false)
        .open(&config.lock_path)
        .unwrap();
    lock_file.lock_exclusive().unwrap();
    std::fs::write(&config.lock_path, b"12345").unwrap();

    let err = startup(&config).await.err().unwrap();

    assert!(matches!(err, LifecycleError::LockFailed(_)), "{err}");
    assert!(config.socket_path.exists(), "socket must survive");
    assert_eq!(
        std::fs::read_to_string(&config.lock_path).unwrap(),
        "12345",
        "running daemon's PID must survive"
    );
    drop(lock_file);
}

#[tokio::test]
async fn startup_failure_cleans_up_lock_file() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    std::fs::write(
        &config.store_path,
        r#"{"version": 99, "saved_at": "2026-01-01T00:00:00Z", "bots": []}"#,
    )
    .unwrap();

    let err = startup(&config).await.err().unwrap();

    assert!(matches!(err, LifecycleError::Store(_)), "{err}");
    assert!(!config.lock_path.exists());
    assert!(!config.socket_path.exists());
}

#[tokio::test]
async fn shutdown_removes_files_and_keeps_bots_active() {
    let dir = tempdir().unwrap();
    let config = test_config(dir.path());
    seed_store(&config, [active_record("bot-1")]).await;

    let mut result = startup(&config).await.unwrap();
    let started = boot_sweep(&result.daemon.manager).await;
    assert_eq!(started, 1);

    result.daemon.shutdown().await.unwrap();

    assert!(!config.socket_path.exists());
    assert!(!config.lock_path.exists());
    assert!(!result.daemon.manager.status(&BotId::new("bot-1")).running);

    let store = JsonFileStore::open(&config.store_path).unwrap();
    let record = store.find_by_id(&BotId::new("bot-1")).await.unwrap().unwrap();
    assert!(record.active, "shutdown must not clear active");
    assert_eq!(record.status, BotStatus::Offline);
}
