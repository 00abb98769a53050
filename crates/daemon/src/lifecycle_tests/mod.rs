// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

use mcb_core::test_support::active_record;
use mcb_core::{BotId, BotRecord, BotStatus};
use mcb_storage::BotStore;
use std::path::Path;
use tempfile::tempdir;

mod boot_sweep;
mod startup_shutdown;

fn test_config(dir: &Path) -> Config {
    Config::for_state_dir(dir.to_owned()).unwrap()
}

/// Write records to the store file before the daemon opens it
async fn seed_store(config: &Config, records: impl IntoIterator<Item = BotRecord>) {
    std::fs::create_dir_all(&config.state_dir).unwrap();
    let store = JsonFileStore::open(&config.store_path).unwrap();
    for record in records {
        store.upsert(record).await.unwrap();
    }
}
