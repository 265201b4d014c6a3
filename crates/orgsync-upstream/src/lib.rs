// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Upstream platform clients
//!
//! Two read-only clients feed the synchronizer: a [`SourceClient`] for the
//! source-control organization API (GitHub) and a [`CatalogClient`] for the
//! developer catalog (Backstage). Both are traits so the synchronizer and
//! the REST server can be exercised against in-memory fakes.

pub mod auth;
pub mod backstage;
pub mod catalog;
pub mod error;
pub mod github;
mod http;
pub mod source;

#[cfg(any(test, feature = "test-utils"))]
pub mod fake;

pub use auth::Secret;
pub use backstage::{BackstageClient, BackstageConfig};
pub use catalog::CatalogClient;
pub use error::{UpstreamError, UpstreamResult, UpstreamService};
pub use github::{GithubClient, GithubConfig};
pub use source::SourceClient;
