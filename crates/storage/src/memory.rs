// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! In-memory record store

use crate::store::{BotFilter, BotStore, StoreError};
use async_trait::async_trait;
use mcb_core::{BotId, BotRecord, StatusUpdate};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Record store kept entirely in memory.
///
/// Cloning shares the underlying records. Writes can be made to fail with
/// [`MemoryStore::set_unavailable`] to exercise error paths.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    records: BTreeMap<BotId, BotRecord>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `records`
    pub fn with_records(records: impl IntoIterator<Item = BotRecord>) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner.lock();
            for record in records {
                inner.records.insert(record.id.clone(), record);
            }
        }
        store
    }

    /// Synchronous lookup for assertions
    pub fn get(&self, id: &str) -> Option<BotRecord> {
        self.inner.lock().records.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Fail every write until cleared
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.lock().unavailable = unavailable;
    }
}

impl MemoryState {
    fn check_writable(&self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl BotStore for MemoryStore {
    async fn find_by_id(&self, id: &BotId) -> Result<Option<BotRecord>, StoreError> {
        Ok(self.inner.lock().records.get(id).cloned())
    }

    async fn find(&self, filter: &BotFilter) -> Result<Vec<BotRecord>, StoreError> {
        let inner = self.inner.lock();
        Ok(inner
            .records
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
        let mut inner = self.inner.lock();
        inner.check_writable()?;
        let record = inner
            .records
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        record.apply(&update);
        Ok(record.clone())
    }

    async fn upsert(&self, record: BotRecord) -> Result<(), StoreError> {
        let mut inner = self.inner.lock();
        inner.check_writable()?;
        inner.records.insert(record.id.clone(), record);
        Ok(())
    }

    async fn delete(&self, id: &BotId) -> Result<Option<BotRecord>, StoreError> {
        let mut inner = self.inner.lock();
        inner.check_writable()?;
        Ok(inner.records.remove(id))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
