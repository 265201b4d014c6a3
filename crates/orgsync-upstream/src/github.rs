// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! GitHub organization client

use crate::auth::Secret;
use crate::error::{UpstreamError, UpstreamResult, UpstreamService};
use crate::http::{build_http_client, check_base_url, decode, endpoint, status_error, transport_error};
use crate::source::SourceClient;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use orgsync_domain_types::{RateLimitStatus, RepositorySummary};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

const SERVICE: UpstreamService = UpstreamService::Github;
const PER_PAGE: usize = 100;
const MAX_PAGES: u32 = 1_000;
const API_VERSION: &str = "2022-11-28";

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Connection settings for [`GithubClient`]
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub api_url: Url,
    pub organization: String,
    pub token: Secret,
    pub timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct GithubRepository {
    name: String,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    disabled: bool,
}

impl From<GithubRepository> for RepositorySummary {
    fn from(repo: GithubRepository) -> Self {
        RepositorySummary::new(repo.name, !repo.archived && !repo.disabled)
    }
}

#[derive(Debug, Deserialize)]
struct GithubContributor {
    // Anonymous contributors come back without a login.
    login: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GithubRateLimit {
    resources: GithubRateResources,
}

#[derive(Debug, Deserialize)]
struct GithubRateResources {
    core: GithubRateBucket,
}

#[derive(Debug, Deserialize)]
struct GithubRateBucket {
    limit: u64,
    remaining: u64,
    #[serde(default)]
    used: u64,
    reset: i64,
}

/// REST v3 client scoped to one organization
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_url: Url,
    organization: String,
    token: Secret,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> UpstreamResult<Self> {
        check_base_url(SERVICE, &config.api_url)?;
        Ok(Self {
            http: build_http_client(SERVICE, config.timeout)?,
            api_url: config.api_url,
            organization: config.organization,
            token: config.token,
        })
    }

    fn repo_url(&self, repo_name: &str, rest: &[&str]) -> Url {
        let mut segments = vec!["repos", self.organization.as_str(), repo_name];
        segments.extend_from_slice(rest);
        endpoint(&self.api_url, &segments)
    }

    async fn send(&self, url: Url) -> UpstreamResult<Response> {
        debug!(url = %url, "GitHub request");
        self.http
            .get(url)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .bearer_auth(self.token.expose())
            .send()
            .await
            .map_err(|e| transport_error(SERVICE, e))
    }

    /// Walk `per_page`/`page` pagination until a short page
    ///
    /// `empty_on` lists statuses that mean "nothing here" rather than an error.
    /// A listing still returning full pages after `MAX_PAGES` is an error, not
    /// a silently truncated result.
    async fn get_all_pages<T>(&self, base: Url, empty_on: &[StatusCode]) -> UpstreamResult<Vec<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        let mut items = Vec::new();
        for page in 1..=MAX_PAGES {
            let mut url = base.clone();
            url.query_pairs_mut()
                .append_pair("per_page", &PER_PAGE.to_string())
                .append_pair("page", &page.to_string());

            let response = self.send(url).await?;
            let status = response.status();
            if empty_on.contains(&status) {
                return Ok(items);
            }
            if !status.is_success() {
                return Err(status_error(SERVICE, &response));
            }

            let batch: Vec<T> = decode(SERVICE, response).await?;
            let len = batch.len();
            items.extend(batch);
            if len < PER_PAGE {
                return Ok(items);
            }
        }

        warn!(url = %base, pages = MAX_PAGES, "listing did not end within the page limit");
        Err(UpstreamError::invalid_response(
            SERVICE,
            format!("{base} still returned full pages after {MAX_PAGES} pages"),
        ))
    }
}

#[async_trait]
impl SourceClient for GithubClient {
    async fn list_repositories(&self) -> UpstreamResult<Vec<RepositorySummary>> {
        let url = endpoint(&self.api_url, &["orgs", self.organization.as_str(), "repos"]);
        let repos: Vec<GithubRepository> = self.get_all_pages(url, &[]).await?;
        debug!(
            organization = %self.organization,
            count = repos.len(),
            "listed organization repositories"
        );
        Ok(repos.into_iter().map(RepositorySummary::from).collect())
    }

    async fn get_repository(&self, repo_name: &str) -> UpstreamResult<Option<RepositorySummary>> {
        let response = self.send(self.repo_url(repo_name, &[])).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let repo: GithubRepository = decode(SERVICE, response).await?;
                Ok(Some(repo.into()))
            }
            _ => Err(status_error(SERVICE, &response)),
        }
    }

    async fn list_contributors(&self, repo_name: &str) -> UpstreamResult<BTreeSet<String>> {
        let url = self.repo_url(repo_name, &["contributors"]);
        // 204 is what GitHub answers for a repository without commits.
        let contributors: Vec<GithubContributor> = self
            .get_all_pages(url, &[StatusCode::NO_CONTENT, StatusCode::NOT_FOUND])
            .await?;
        Ok(contributors.into_iter().filter_map(|c| c.login).collect())
    }

    async fn has_automation(&self, repo_name: &str) -> UpstreamResult<bool> {
        let url = self.repo_url(repo_name, &["contents", ".github", "workflows"]);
        let response = self.send(url).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(false),
            status if status.is_success() => {
                // A file at this path instead of a directory fails to decode.
                let entries: Vec<serde_json::Value> = decode(SERVICE, response).await?;
                Ok(!entries.is_empty())
            }
            _ => Err(status_error(SERVICE, &response)),
        }
    }

    async fn rate_limit(&self) -> UpstreamResult<RateLimitStatus> {
        let response = self.send(endpoint(&self.api_url, &["rate_limit"])).await?;
        if !response.status().is_success() {
            return Err(status_error(SERVICE, &response));
        }
        let body: GithubRateLimit = decode(SERVICE, response).await?;
        let core = body.resources.core;
        let resets_at = Utc.timestamp_opt(core.reset, 0).single().ok_or_else(|| {
            UpstreamError::invalid_response(SERVICE, format!("invalid reset epoch {}", core.reset))
        })?;

        Ok(RateLimitStatus {
            limit: core.limit,
            remaining: core.remaining,
            used: core.used,
            resets_at,
        })
    }
}
