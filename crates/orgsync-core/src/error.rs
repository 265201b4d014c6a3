// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use orgsync_domain_types::SyncFailureKind;
use orgsync_upstream::UpstreamError;
use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

/// Failures that abort a sync before any per-repository work starts
///
/// Per-repository failures never surface here; they are collected into the
/// report instead.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("failed to list organization repositories: {0}")]
    Listing(#[source] UpstreamError),

    #[error("repository '{0}' does not exist in the organization")]
    RepositoryNotFound(String),
}

impl SyncError {
    pub fn failure_kind(&self) -> Option<SyncFailureKind> {
        match self {
            SyncError::Listing(e) => Some(e.failure_kind()),
            SyncError::RepositoryNotFound(_) => None,
        }
    }

    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            SyncError::Listing(e) => e.retry_after_secs(),
            SyncError::RepositoryNotFound(_) => None,
        }
    }
}
