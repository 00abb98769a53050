// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON file record store.
//!
//! All records live in one file that is rewritten atomically on every
//! change. A file that fails to parse is moved aside to a rotated `.bak`
//! and the store starts empty.

use crate::store::{BotFilter, BotStore, StoreError};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mcb_core::{BotId, BotRecord, StatusUpdate};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Current on-disk format version
pub const CURRENT_STORE_VERSION: u32 = 1;

const MAX_BAK_FILES: u32 = 3;

/// On-disk layout
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    version: u32,
    saved_at: DateTime<Utc>,
    bots: Vec<BotRecord>,
}

/// Record store backed by a single JSON file
pub struct JsonFileStore {
    path: PathBuf,
    records: Mutex<BTreeMap<BotId, BotRecord>>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating it lazily on first write
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = load(&path)?
            .map(|file| {
                file.bots
                    .into_iter()
                    .map(|r| (r.id.clone(), r))
                    .collect::<BTreeMap<_, _>>()
            })
            .unwrap_or_default();
        debug!(path = %path.display(), count = records.len(), "bot store opened");
        Ok(Self {
            path,
            records: Mutex::new(records),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run `f` against the records and persist if it succeeds.
    ///
    /// The in-memory map is only replaced once the file write succeeded.
    fn write<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<BotId, BotRecord>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut records = self.records.lock();
        let mut next = records.clone();
        let out = f(&mut next)?;
        save(&self.path, &next)?;
        *records = next;
        Ok(out)
    }
}

#[async_trait]
impl BotStore for JsonFileStore {
    async fn find_by_id(&self, id: &BotId) -> Result<Option<BotRecord>, StoreError> {
        Ok(self.records.lock().get(id).cloned())
    }

    async fn find(&self, filter: &BotFilter) -> Result<Vec<BotRecord>, StoreError> {
        Ok(self
            .records
            .lock()
            .values()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect())
    }

    async fn update_status(
        &self,
        id: &BotId,
        update: StatusUpdate,
    ) -> Result<BotRecord, StoreError> {
        self.write(|records| {
            let record = records
                .get_mut(id)
                .ok_or_else(|| StoreError::NotFound(id.clone()))?;
            record.apply(&update);
            Ok(record.clone())
        })
    }

    async fn upsert(&self, record: BotRecord) -> Result<(), StoreError> {
        self.write(|records| {
            records.insert(record.id.clone(), record);
            Ok(())
        })
    }

    async fn delete(&self, id: &BotId) -> Result<Option<BotRecord>, StoreError> {
        self.write(|records| Ok(records.remove(id)))
    }
}

/// Write all records atomically (write to .tmp, fsync, rename)
fn save(path: &Path, records: &BTreeMap<BotId, BotRecord>) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("tmp");
    let file = StoreFile {
        version: CURRENT_STORE_VERSION,
        saved_at: Utc::now(),
        bots: records.values().cloned().collect(),
    };

    {
        let out = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(out);
        serde_json::to_writer_pretty(&mut writer, &file)?;
        let out = writer.into_inner().map_err(|e| e.into_error())?;
        out.sync_all()?;
    }

    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Load the store file if it exists.
///
/// Returns `Ok(None)` if the file doesn't exist or is corrupt.
fn load(path: &Path) -> Result<Option<StoreFile>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }

    let reader = BufReader::new(File::open(path)?);
    match serde_json::from_reader::<_, StoreFile>(reader) {
        Ok(file) if file.version <= CURRENT_STORE_VERSION => Ok(Some(file)),
        Ok(file) => {
            warn!(
                version = file.version,
                path = %path.display(),
                "bot store written by a newer version, refusing to load",
            );
            Err(StoreError::Unavailable(format!(
                "unsupported store version {}",
                file.version
            )))
        }
        Err(e) => {
            let bak_path = rotate_bak_path(path);
            warn!(
                error = %e,
                path = %path.display(),
                bak = %bak_path.display(),
                "corrupt bot store, moving to .bak and starting empty",
            );
            fs::rename(path, &bak_path)?;
            Ok(None)
        }
    }
}

/// Pick the next `.bak` / `.bak.N` path, rotating older backups out.
///
/// Keeps up to [`MAX_BAK_FILES`] backups: `.bak`, `.bak.2`, `.bak.3`.
pub(crate) fn rotate_bak_path(path: &Path) -> PathBuf {
    let bak = |n: u32| {
        if n == 1 {
            path.with_extension("bak")
        } else {
            path.with_extension(format!("bak.{n}"))
        }
    };

    let oldest = bak(MAX_BAK_FILES);
    if oldest.exists() {
        let _ = fs::remove_file(&oldest);
    }

    for n in (1..MAX_BAK_FILES).rev() {
        let src = bak(n);
        if src.exists() {
            let _ = fs::rename(&src, bak(n + 1));
        }
    }

    bak(1)
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
