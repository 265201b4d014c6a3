// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The sync routine: list, fetch details, map, upsert

use crate::clock::{Clock, SystemClock};
use crate::error::{SyncError, SyncResult};
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use orgsync_domain_types::{
    RepositoryRecord, RepositorySummary, SyncFailure, SyncFailureKind, SyncReport,
};
use orgsync_store::RepositoryStore;
use orgsync_upstream::{CatalogClient, SourceClient};
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const DEFAULT_CONCURRENCY: usize = 10;
pub const MAX_CONCURRENCY: usize = 50;

/// Per-run tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    /// Repositories processed at the same time, clamped to `1..=MAX_CONCURRENCY`
    pub concurrency: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl SyncOptions {
    pub fn with_concurrency(concurrency: usize) -> Self {
        Self {
            concurrency: concurrency.clamp(1, MAX_CONCURRENCY),
        }
    }
}

/// Reconciles the organization listing into the repository store
#[derive(Clone)]
pub struct Synchronizer {
    source: Arc<dyn SourceClient>,
    catalog: Arc<dyn CatalogClient>,
    store: Arc<dyn RepositoryStore>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for Synchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizer").field("clock", &self.clock).finish_non_exhaustive()
    }
}

impl Synchronizer {
    pub fn new(
        source: Arc<dyn SourceClient>,
        catalog: Arc<dyn CatalogClient>,
        store: Arc<dyn RepositoryStore>,
    ) -> Self {
        Self {
            source,
            catalog,
            store,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Synchronize every repository the organization lists
    ///
    /// Only a failed listing aborts the run. Each repository's failure is
    /// recorded in the report and does not stop the others; records already
    /// upserted stay committed.
    pub async fn sync(&self, options: SyncOptions) -> SyncResult<SyncReport> {
        let started_at = self.clock.now();
        let repositories = self.source.list_repositories().await.map_err(SyncError::Listing)?;
        info!(
            repositories = repositories.len(),
            concurrency = options.concurrency,
            "sync started"
        );

        let concurrency = options.concurrency.clamp(1, MAX_CONCURRENCY);
        let outcomes: Vec<_> = stream::iter(repositories)
            .map(|summary| self.sync_one(summary, started_at))
            .buffer_unordered(concurrency)
            .collect()
            .await;

        let report = SyncReport::from_outcomes(started_at, self.clock.now(), outcomes);
        info!(
            status = %report.status,
            processed = report.processed,
            succeeded = report.succeeded,
            failed = report.failed,
            "sync finished"
        );
        Ok(report)
    }

    /// Synchronize a single repository by name
    pub async fn sync_repository(&self, name: &str) -> SyncResult<SyncReport> {
        let started_at = self.clock.now();
        let summary = self
            .source
            .get_repository(name)
            .await
            .map_err(SyncError::Listing)?
            .ok_or_else(|| SyncError::RepositoryNotFound(name.to_string()))?;

        let outcome = self.sync_one(summary, started_at).await;
        Ok(SyncReport::from_outcomes(started_at, self.clock.now(), [outcome]))
    }

    async fn sync_one(
        &self,
        summary: RepositorySummary,
        synced_at: DateTime<Utc>,
    ) -> Result<String, SyncFailure> {
        let name = summary.name.as_str();
        let (contributors, has_automation, has_catalog_integration) = tokio::try_join!(
            self.source.list_contributors(name),
            self.source.has_automation(name),
            self.catalog.has_integration(name),
        )
        .map_err(|e| failed(name, e.failure_kind(), e.to_string()))?;

        let record = RepositoryRecord::from_parts(
            &summary,
            contributors,
            has_automation,
            has_catalog_integration,
            synced_at,
        );
        self.store
            .upsert(&record)
            .await
            .map_err(|e| failed(name, e.failure_kind(), e.to_string()))?;

        debug!(repository = name, "repository synchronized");
        Ok(record.name)
    }
}

fn failed(repository: &str, kind: SyncFailureKind, message: String) -> SyncFailure {
    warn!(repository, kind = %kind, error = %message, "repository sync failed");
    SyncFailure {
        repository: repository.to_string(),
        kind,
        message,
    }
}
