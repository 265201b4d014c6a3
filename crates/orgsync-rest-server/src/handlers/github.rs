// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Repository snapshot, sync trigger and upstream diagnostics

use crate::{state::AppState, ServerError, ServerResult};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use orgsync_domain_types::{RateLimitStatus, RepositoryRecord, SyncReport};
use orgsync_rest_api_contract::{
    validate_repository_name, validate_sync_query, PingResponse, SyncQuery,
};
use tracing::info;

/// All stored records, sorted by name
pub async fn list_repositories(
    State(state): State<AppState>,
) -> ServerResult<Json<Vec<RepositoryRecord>>> {
    Ok(Json(state.store.list_all().await?))
}

/// Names of active repositories
pub async fn list_active_repositories(
    State(state): State<AppState>,
) -> ServerResult<Json<Vec<String>>> {
    Ok(Json(state.store.list_active_names().await?))
}

/// Run a full sync and return its report
///
/// Anything short of full success is answered with a problem document that
/// carries the report.
pub async fn sync_repositories(
    State(state): State<AppState>,
    query: Result<Query<SyncQuery>, QueryRejection>,
) -> ServerResult<Json<SyncReport>> {
    let Query(query) = query.map_err(|e| ServerError::BadRequest(e.body_text()))?;
    validate_sync_query(&query)?;

    let options = state.sync_options(query.batch_size);
    info!(concurrency = options.concurrency, "sync requested");
    let report = state.synchronizer.sync(options).await?;
    into_sync_response(report)
}

/// Sync a single repository by name
pub async fn sync_repository(
    State(state): State<AppState>,
    Path(repository_name): Path<String>,
) -> ServerResult<Json<SyncReport>> {
    validate_repository_name(&repository_name)?;

    info!(repository = %repository_name, "single repository sync requested");
    let report = state.synchronizer.sync_repository(&repository_name).await?;
    into_sync_response(report)
}

fn into_sync_response(report: SyncReport) -> ServerResult<Json<SyncReport>> {
    if report.is_success() {
        Ok(Json(report))
    } else {
        Err(ServerError::PartialSync(Box::new(report)))
    }
}

/// Catalog connectivity diagnostic
pub async fn test_catalog(State(state): State<AppState>) -> ServerResult<Json<PingResponse>> {
    let reachable = state.catalog.ping().await?;
    Ok(Json(PingResponse { reachable }))
}

/// Request quota left on the GitHub token
pub async fn rate_limit(State(state): State<AppState>) -> ServerResult<Json<RateLimitStatus>> {
    Ok(Json(state.source.rate_limit().await?))
}
