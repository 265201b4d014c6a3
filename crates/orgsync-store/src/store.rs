// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use crate::error::StoreResult;
use async_trait::async_trait;
use orgsync_domain_types::RepositoryRecord;

/// Keyed collection of repository records
///
/// Each call is atomic for the single document it touches; nothing spans
/// several records. Implementations must be safe for concurrent upserts to
/// different names interleaved with reads.
#[async_trait]
pub trait RepositoryStore: Send + Sync {
    /// Insert the record, or replace every field of the record with the same name
    async fn upsert(&self, record: &RepositoryRecord) -> StoreResult<()>;

    /// Every stored record, sorted by name
    async fn list_all(&self) -> StoreResult<Vec<RepositoryRecord>>;

    /// Names of records with `is_active == true`, sorted
    async fn list_active_names(&self) -> StoreResult<Vec<String>>;

    async fn get(&self, name: &str) -> StoreResult<Option<RepositoryRecord>>;

    /// Round-trip to the backend for health checks
    async fn ping(&self) -> StoreResult<()>;
}
