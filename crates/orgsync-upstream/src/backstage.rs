// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Backstage catalog client
//!
//! A repository counts as integrated when one of the catalog's registered
//! locations points into it. Entity names and kinds are not consulted, so a
//! `catalog-info.yaml` describing an entity named differently from its
//! repository still counts.

use crate::auth::Secret;
use crate::catalog::CatalogClient;
use crate::error::{UpstreamResult, UpstreamService};
use crate::http::{build_http_client, check_base_url, decode, endpoint, status_error, transport_error};
use async_trait::async_trait;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

const SERVICE: UpstreamService = UpstreamService::Catalog;

/// Connection settings for [`BackstageClient`]
#[derive(Debug, Clone)]
pub struct BackstageConfig {
    /// Root of the Backstage deployment, including any path prefix
    pub base_url: Url,
    pub token: Secret,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct CatalogLocation {
    data: CatalogLocationData,
}

#[derive(Debug, Deserialize)]
struct CatalogLocationData {
    #[serde(default)]
    target: Option<String>,
}

/// Repository name a location target points into
///
/// Targets look like `https://github.com/{org}/{repo}/blob/main/catalog-info.yaml`;
/// the repository is the second path segment. Targets that are not URLs,
/// such as `file` locations, name no repository.
fn target_repository(target: &str) -> Option<&str> {
    let path = target.split_once("://")?.1;
    let repo = path.split('/').nth(2)?;
    let repo = repo.strip_suffix(".git").unwrap_or(repo);
    (!repo.is_empty()).then_some(repo)
}

#[derive(Debug, Clone)]
pub struct BackstageClient {
    http: reqwest::Client,
    base_url: Url,
    token: Secret,
}

impl BackstageClient {
    pub fn new(config: BackstageConfig) -> UpstreamResult<Self> {
        check_base_url(SERVICE, &config.base_url)?;
        Ok(Self {
            http: build_http_client(SERVICE, config.timeout)?,
            base_url: config.base_url,
            token: config.token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn locations_url(&self) -> Url {
        endpoint(&self.base_url, &["api", "catalog", "locations"])
    }

    async fn send(&self, url: Url) -> UpstreamResult<Response> {
        debug!(url = %url, "catalog request");
        self.http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(self.token.expose())
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))
    }
}

#[async_trait]
impl CatalogClient for BackstageClient {
    async fn has_integration(&self, repo_name: &str) -> UpstreamResult<bool> {
        let response = self.send(self.locations_url()).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => {
                let locations: Vec<CatalogLocation> = decode(SERVICE, response).await?;
                Ok(locations
                    .iter()
                    .filter_map(|l| l.data.target.as_deref())
                    .filter_map(target_repository)
                    .any(|repo| repo.eq_ignore_ascii_case(repo_name)))
            }
            _ => Err(status_error(SERVICE, &response)),
        }
    }

    async fn ping(&self) -> UpstreamResult<bool> {
        let mut url = endpoint(&self.base_url, &["api", "catalog", "entities"]);
        url.query_pairs_mut().append_pair("limit", "1");

        let response = self.send(url).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            return Err(status_error(SERVICE, &response));
        }
        debug!(status = status.as_u16(), "catalog ping answered without success");
        Ok(false)
    }
}
