// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! In-process store (for development/testing)

use crate::error::{StoreError, StoreResult};
use crate::store::RepositoryStore;
use async_trait::async_trait;
use orgsync_domain_types::RepositoryRecord;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryRepositoryStore {
    records: RwLock<BTreeMap<String, RepositoryRecord>>,
    rejected: RwLock<HashSet<String>>,
}

impl InMemoryRepositoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later upsert of `name` fail, to exercise store failure paths
    pub async fn reject_writes_for(&self, name: &str) {
        self.rejected.write().await.insert(name.to_string());
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl RepositoryStore for InMemoryRepositoryStore {
    async fn upsert(&self, record: &RepositoryRecord) -> StoreResult<()> {
        if self.rejected.read().await.contains(&record.name) {
            return Err(StoreError::Unavailable(format!(
                "write rejected for '{}'",
                record.name
            )));
        }
        let mut records = self.records.write().await;
        records.insert(record.name.clone(), record.clone());
        Ok(())
    }

    async fn list_all(&self) -> StoreResult<Vec<RepositoryRecord>> {
        let records = self.records.read().await;
        Ok(records.values().cloned().collect())
    }

    async fn list_active_names(&self) -> StoreResult<Vec<String>> {
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.is_active)
            .map(|r| r.name.clone())
            .collect())
    }

    async fn get(&self, name: &str) -> StoreResult<Option<RepositoryRecord>> {
        let records = self.records.read().await;
        Ok(records.get(name).cloned())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
