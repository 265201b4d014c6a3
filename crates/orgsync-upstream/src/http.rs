// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Request plumbing shared by both clients

use crate::error::{UpstreamError, UpstreamResult, UpstreamService};
use reqwest::{Response, StatusCode, header::HeaderMap};
use serde::de::DeserializeOwned;
use std::time::Duration;
use url::Url;

pub(crate) const USER_AGENT: &str = concat!("orgsync/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_http_client(
    service: UpstreamService,
    timeout: Duration,
) -> UpstreamResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| UpstreamError::unavailable(service, format!("failed to build HTTP client: {e}")))
}

/// Base URLs must accept path segments, e.g. `https://api.github.com`
pub(crate) fn check_base_url(service: UpstreamService, url: &Url) -> UpstreamResult<()> {
    if url.cannot_be_a_base() {
        return Err(UpstreamError::unavailable(
            service,
            format!("{url} cannot be used as an API base URL"),
        ));
    }
    Ok(())
}

/// Append percent-encoded path segments to `base`
pub(crate) fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

pub(crate) fn transport_error(service: UpstreamService, err: reqwest::Error) -> UpstreamError {
    if err.is_decode() {
        UpstreamError::invalid_response(service, err.to_string())
    } else {
        UpstreamError::unavailable(service, err.to_string())
    }
}

/// Map a non-success response onto the error taxonomy
pub(crate) fn status_error(service: UpstreamService, response: &Response) -> UpstreamError {
    let status = response.status();
    let headers = response.headers();

    if is_rate_limited(status, headers) {
        return UpstreamError::RateLimited {
            service,
            retry_after_secs: retry_after_secs(headers, chrono::Utc::now().timestamp()),
        };
    }

    let message = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("authentication rejected (HTTP {}) for {}", status.as_u16(), response.url())
        }
        _ => format!("HTTP {} from {}", status.as_u16(), response.url()),
    };
    UpstreamError::unavailable(service, message)
}

fn is_rate_limited(status: StatusCode, headers: &HeaderMap) -> bool {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return true;
    }
    // GitHub signals both primary and secondary limits with 403.
    status == StatusCode::FORBIDDEN
        && (header_str(headers, "x-ratelimit-remaining") == Some("0")
            || headers.contains_key(reqwest::header::RETRY_AFTER))
}

fn retry_after_secs(headers: &HeaderMap, now_epoch: i64) -> Option<u64> {
    if let Some(secs) = header_str(headers, "retry-after").and_then(|v| v.parse::<u64>().ok()) {
        return Some(secs);
    }
    header_str(headers, "x-ratelimit-reset")
        .and_then(|v| v.parse::<i64>().ok())
        .map(|reset| reset.saturating_sub(now_epoch).max(0) as u64)
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim)
}

/// Read the body and decode it into a boundary record
pub(crate) async fn decode<T: DeserializeOwned>(
    service: UpstreamService,
    response: Response,
) -> UpstreamResult<T> {
    let url = response.url().clone();
    let text = response.text().await.map_err(|e| transport_error(service, e))?;
    serde_json::from_str(&text)
        .map_err(|e| UpstreamError::invalid_response(service, format!("{url}: {e}")))
}
