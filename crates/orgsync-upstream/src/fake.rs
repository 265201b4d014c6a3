// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! In-memory upstream platforms for tests
//!
//! The fakes are mutable after construction so a test can change the
//! organization between two sync runs.

use crate::catalog::CatalogClient;
use crate::error::{UpstreamError, UpstreamResult, UpstreamService};
use crate::source::SourceClient;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use orgsync_domain_types::{RateLimitStatus, RepositorySummary};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
struct FakeRepository {
    is_active: bool,
    contributors: BTreeSet<String>,
    has_automation: bool,
}

/// Fake organization on the source-control platform
#[derive(Debug, Default)]
pub struct FakeSourceClient {
    repositories: Mutex<BTreeMap<String, FakeRepository>>,
    repository_failures: Mutex<HashMap<String, UpstreamError>>,
    listing_failure: Mutex<Option<UpstreamError>>,
    detail_calls: AtomicUsize,
}

impl FakeSourceClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a repository
    pub fn with_repository(
        self,
        name: &str,
        is_active: bool,
        contributors: &[&str],
        has_automation: bool,
    ) -> Self {
        self.put_repository(name, is_active, contributors, has_automation);
        self
    }

    pub fn put_repository(
        &self,
        name: &str,
        is_active: bool,
        contributors: &[&str],
        has_automation: bool,
    ) {
        let repo = FakeRepository {
            is_active,
            contributors: contributors.iter().map(|c| c.to_string()).collect(),
            has_automation,
        };
        lock(&self.repositories).insert(name.to_string(), repo);
    }

    pub fn remove_repository(&self, name: &str) {
        lock(&self.repositories).remove(name);
    }

    /// Make every detail fetch for `name` fail with `error`
    pub fn fail_repository(&self, name: &str, error: UpstreamError) {
        lock(&self.repository_failures).insert(name.to_string(), error);
    }

    pub fn fail_listing(&self, error: UpstreamError) {
        *lock(&self.listing_failure) = Some(error);
    }

    /// Number of per-repository detail calls served so far
    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }

    fn repository(&self, name: &str) -> UpstreamResult<Option<FakeRepository>> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = lock(&self.repository_failures).get(name) {
            return Err(error.clone());
        }
        Ok(lock(&self.repositories).get(name).cloned())
    }
}

#[async_trait]
impl SourceClient for FakeSourceClient {
    async fn list_repositories(&self) -> UpstreamResult<Vec<RepositorySummary>> {
        if let Some(error) = lock(&self.listing_failure).clone() {
            return Err(error);
        }
        Ok(lock(&self.repositories)
            .iter()
            .map(|(name, repo)| RepositorySummary::new(name.clone(), repo.is_active))
            .collect())
    }

    async fn get_repository(&self, repo_name: &str) -> UpstreamResult<Option<RepositorySummary>> {
        if let Some(error) = lock(&self.listing_failure).clone() {
            return Err(error);
        }
        Ok(lock(&self.repositories)
            .get(repo_name)
            .map(|repo| RepositorySummary::new(repo_name, repo.is_active)))
    }

    async fn list_contributors(&self, repo_name: &str) -> UpstreamResult<BTreeSet<String>> {
        Ok(self.repository(repo_name)?.map(|r| r.contributors).unwrap_or_default())
    }

    async fn has_automation(&self, repo_name: &str) -> UpstreamResult<bool> {
        Ok(self.repository(repo_name)?.is_some_and(|r| r.has_automation))
    }

    async fn rate_limit(&self) -> UpstreamResult<RateLimitStatus> {
        let resets_at = Utc
            .timestamp_opt(1_700_000_000, 0)
            .single()
            .ok_or_else(|| UpstreamError::invalid_response(UpstreamService::Github, "epoch"))?;
        let used = self.detail_calls() as u64;
        Ok(RateLimitStatus {
            limit: 5000,
            remaining: 5000u64.saturating_sub(used),
            used,
            resets_at,
        })
    }
}

/// Fake developer catalog
#[derive(Debug)]
pub struct FakeCatalogClient {
    integrations: Mutex<HashSet<String>>,
    failures: Mutex<HashMap<String, UpstreamError>>,
    ping_result: Mutex<UpstreamResult<bool>>,
}

impl Default for FakeCatalogClient {
    fn default() -> Self {
        Self {
            integrations: Mutex::new(HashSet::new()),
            failures: Mutex::new(HashMap::new()),
            ping_result: Mutex::new(Ok(true)),
        }
    }
}

impl FakeCatalogClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_integration(self, name: &str) -> Self {
        lock(&self.integrations).insert(name.to_string());
        self
    }

    pub fn fail_repository(&self, name: &str, error: UpstreamError) {
        lock(&self.failures).insert(name.to_string(), error);
    }

    pub fn set_ping_result(&self, result: UpstreamResult<bool>) {
        *lock(&self.ping_result) = result;
    }
}

#[async_trait]
impl CatalogClient for FakeCatalogClient {
    async fn has_integration(&self, repo_name: &str) -> UpstreamResult<bool> {
        if let Some(error) = lock(&self.failures).get(repo_name) {
            return Err(error.clone());
        }
        Ok(lock(&self.integrations).contains(repo_name))
    }

    async fn ping(&self) -> UpstreamResult<bool> {
        lock(&self.ping_result).clone()
    }
}

// A poisoned lock only means another test thread panicked; keep serving.
fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
