// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Developer catalog API surface

use crate::error::UpstreamResult;
use async_trait::async_trait;

#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Whether a catalog location is registered inside `repo_name`
    ///
    /// A missing entry is `Ok(false)`, never an error.
    async fn has_integration(&self, repo_name: &str) -> UpstreamResult<bool>;

    /// Reachability check that asserts nothing about any repository
    async fn ping(&self) -> UpstreamResult<bool>;
}
