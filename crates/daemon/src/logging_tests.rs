// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use tempfile::tempdir;

fn write_bytes(path: &Path, size: u64) {
    let mut f = std::fs::File::create(path).unwrap();
    f.write_all(&vec![b'x'; size as usize]).unwrap();
}

#[test]
fn rotate_skips_small_file() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("mcbd.log");
    write_bytes(&log, 1024);

    rotate_log_if_needed(&log);

    assert!(log.exists(), "small log should not be rotated");
    assert!(!dir.path().join("mcbd.log.1").exists());
}

#[test]
fn rotate_moves_large_file() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("mcbd.log");
    write_bytes(&log, MAX_LOG_SIZE + 1);

    rotate_log_if_needed(&log);

    assert!(!log.exists(), "original should be renamed");
    assert!(dir.path().join("mcbd.log.1").exists());
}

#[test]
fn rotate_drops_oldest_when_full() {
    let dir = tempdir().unwrap();
    let log = dir.path().join("mcbd.log");
    write_bytes(&dir.path().join("mcbd.log.1"), 100);
    write_bytes(&dir.path().join("mcbd.log.2"), 200);
    write_bytes(&dir.path().join("mcbd.log.3"), 300);
    write_bytes(&log, MAX_LOG_SIZE + 1);

    rotate_log_if_needed(&log);

    assert!(!log.exists());
    let size = |n: u32| {
        std::fs::metadata(dir.path().join(format!("mcbd.log.{n}")))
            .unwrap()
            .len()
    };
    assert_eq!(size(1), MAX_LOG_SIZE + 1);
    assert_eq!(size(2), 100);
    assert_eq!(size(3), 200, "old .3 is dropped, old .2 shifts up");
}

#[test]
fn rotate_noop_when_file_missing() {
    let dir = tempdir().unwrap();
    rotate_log_if_needed(&dir.path().join("mcbd.log"));
}

#[test]
fn startup_marker_is_appended_with_pid() {
    let dir = tempdir().unwrap();
    let config = Config::for_state_dir(dir.path().to_owned()).unwrap();
    std::fs::write(&config.log_path, "previous run\n").unwrap();

    write_startup_marker(&config).unwrap();

    let log = std::fs::read_to_string(&config.log_path).unwrap();
    assert!(log.starts_with("previous run\n"));
    assert!(log.contains(&format!("{}{})", STARTUP_MARKER_PREFIX, std::process::id())));
}

#[test]
fn startup_error_is_written_synchronously() {
    let dir = tempdir().unwrap();
    let config = Config::for_state_dir(dir.path().to_owned()).unwrap();

    write_startup_error(&config, &LifecycleError::NoStateDir);

    let log = std::fs::read_to_string(&config.log_path).unwrap();
    assert!(log.contains("ERROR Failed to start daemon: Could not determine state directory"));
}
