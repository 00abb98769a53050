// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Record store boundary.
//!
//! The lifecycle manager never owns bot records. It reads them through
//! [`BotStore`] and writes back status changes only.

use async_trait::async_trait;
use mcb_core::{BotId, BotRecord, BotStatus, OwnerId, StatusUpdate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from record store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("bot not found: {0}")]
    NotFound(BotId),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Query over bot records. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BotStatus>,
}

impl BotFilter {
    pub fn all() -> Self {
        Self::default()
    }

    /// Records the boot sweep should start
    pub fn active() -> Self {
        Self {
            active: Some(true),
            ..Self::default()
        }
    }

    pub fn owner(mut self, owner: impl Into<OwnerId>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn status(mut self, status: BotStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn matches(&self, record: &BotRecord) -> bool {
        self.active.is_none_or(|a| record.active == a)
            && self.owner.as_ref().is_none_or(|o| &record.owner == o)
            && self.status.is_none_or(|s| record.status == s)
    }
}

/// Persistent bot record storage
#[async_trait]
pub trait BotStore: Send + Sync + 'static {
    async fn find_by_id(&self, id: &BotId) -> Result<Option<BotRecord>, StoreError>;

    /// Records matching `filter`, ordered by id
    async fn find(&self, filter: &BotFilter) -> Result<Vec<BotRecord>, StoreError>;

    /// Apply a status write-back and return the updated record
    async fn update_status(
        &self,
        id: &BotId,
        update: StatusUpdate,
    ) -> Result<BotRecord, StoreError>;

    /// Insert or replace a record
    async fn upsert(&self, record: BotRecord) -> Result<(), StoreError>;

    /// Remove a record, returning it if it existed
    async fn delete(&self, id: &BotId) -> Result<Option<BotRecord>, StoreError>;
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
