// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Health check endpoints

use crate::{state::AppState, ServerResult};
use axum::{extract::State, http::StatusCode, Json};
use orgsync_rest_api_contract::{
    BuildInfo, HealthResponse, HealthStatus, ServiceHealth, VersionResponse,
};
use std::collections::BTreeMap;

/// Health check endpoint
///
/// Pings the store and checks that both upstream tokens are configured.
/// Answers 503 when anything is unhealthy.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut services = BTreeMap::new();

    let store = match state.store.ping().await {
        Ok(()) => ServiceHealth::healthy(),
        Err(err) => ServiceHealth::unhealthy(err.to_string()),
    };
    services.insert("store".to_string(), store);

    let github = if state.config.github_org.trim().is_empty() {
        ServiceHealth::unhealthy("no GitHub organization configured")
    } else if state.config.github_token.is_empty() {
        ServiceHealth::unhealthy("no GitHub token configured")
    } else {
        ServiceHealth::healthy()
    };
    services.insert("github".to_string(), github);

    let catalog = if state.config.backstage_token.is_empty() {
        ServiceHealth::unhealthy("no Backstage token configured")
    } else {
        ServiceHealth::healthy()
    };
    services.insert("catalog".to_string(), catalog);

    let response = HealthResponse::from_services(services, chrono::Utc::now());
    let status = match response.status {
        HealthStatus::Healthy => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status, Json(response))
}

/// Version endpoint
pub async fn version() -> ServerResult<Json<VersionResponse>> {
    let response = VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        build_info: BuildInfo {
            git_commit: option_env!("VERGEN_GIT_SHA").map(|s| s.to_string()),
            build_date: option_env!("VERGEN_BUILD_DATE").map(|s| s.to_string()),
        },
    };
    Ok(Json(response))
}
