// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Source-control organization API surface

use crate::error::UpstreamResult;
use async_trait::async_trait;
use orgsync_domain_types::{RateLimitStatus, RepositorySummary};
use std::collections::BTreeSet;

/// Read access to one organization on the source-control platform
///
/// Every call is a fresh remote request; implementations keep no cache.
#[async_trait]
pub trait SourceClient: Send + Sync {
    /// Every repository visible to the organization, all pages
    async fn list_repositories(&self) -> UpstreamResult<Vec<RepositorySummary>>;

    /// A single repository, or `None` when the organization has no such name
    async fn get_repository(&self, repo_name: &str) -> UpstreamResult<Option<RepositorySummary>>;

    /// Contributor logins; empty for repositories without history
    async fn list_contributors(&self, repo_name: &str) -> UpstreamResult<BTreeSet<String>>;

    /// Whether the repository defines at least one automated workflow
    async fn has_automation(&self, repo_name: &str) -> UpstreamResult<bool>;

    /// Current request quota for the configured token
    async fn rate_limit(&self) -> UpstreamResult<RateLimitStatus>;
}
