// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;

fn clear() {
    std::env::remove_var("MCB_STATE_DIR");
    std::env::remove_var("XDG_STATE_HOME");
    std::env::remove_var("MCB_TICK_MS");
}

#[test]
#[serial(env)]
fn state_dir_prefers_explicit_override() {
    clear();
    std::env::set_var("MCB_STATE_DIR", "/tmp/mcb-explicit");
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");
    assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/mcb-explicit"));
    clear();
}

#[test]
#[serial(env)]
fn state_dir_falls_back_to_xdg() {
    clear();
    std::env::set_var("XDG_STATE_HOME", "/tmp/xdg");
    assert_eq!(state_dir().unwrap(), PathBuf::from("/tmp/xdg/mcb"));
    clear();
}

#[test]
#[serial(env)]
fn state_dir_defaults_under_home() {
    clear();
    let home = std::env::var("HOME").unwrap();
    assert_eq!(
        state_dir().unwrap(),
        PathBuf::from(home).join(".local/state/mcb")
    );
}

#[test]
#[serial(env)]
fn tick_interval_parses_millis() {
    clear();
    assert_eq!(tick_interval(), None);

    std::env::set_var("MCB_TICK_MS", "250");
    assert_eq!(tick_interval(), Some(Duration::from_millis(250)));

    std::env::set_var("MCB_TICK_MS", "0");
    assert_eq!(tick_interval(), None);

    std::env::set_var("MCB_TICK_MS", "soon");
    assert_eq!(tick_interval(), None);
    clear();
}
