// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

mod common;

use axum::http::StatusCode;
use common::{send, MockServerDependencies};
use orgsync_store::RepositoryStore;
use orgsync_upstream::fake::{FakeCatalogClient, FakeSourceClient};
use orgsync_upstream::{UpstreamError, UpstreamService};
use serde_json::json;

#[tokio::test]
async fn empty_collection_reads_as_empty_lists() {
    let deps = MockServerDependencies::two_services();
    let router = deps.router();

    let all = send(&router, "GET", "/github/").await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body, json!([]));

    let active = send(&router, "GET", "/github/active-repositories").await;
    assert_eq!(active.status, StatusCode::OK);
    assert_eq!(active.body, json!([]));
}

#[tokio::test]
async fn sync_then_read_back_the_snapshot() {
    let deps = MockServerDependencies::two_services();
    let router = deps.router();

    let sync = send(&router, "POST", "/github/sync").await;
    assert_eq!(sync.status, StatusCode::OK);
    assert_eq!(sync.body["status"], "success");
    assert_eq!(sync.body["processed"], 2);
    assert_eq!(sync.body["repositories"], json!(["svc-a", "svc-b"]));

    let all = send(&router, "GET", "/github/").await;
    let records = all.body.as_array().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0]["name"], "svc-a");
    assert_eq!(records[0]["contributors"], json!(["alice", "bob"]));
    assert_eq!(records[0]["has_automation"], true);
    assert_eq!(records[0]["has_catalog_integration"], true);
    assert_eq!(records[1]["name"], "svc-b");
    assert_eq!(records[1]["contributors"], json!([]));
    assert_eq!(records[1]["has_catalog_integration"], false);

    // Same listing without the trailing slash.
    let bare = send(&router, "GET", "/github").await;
    assert_eq!(bare.body, all.body);

    let active = send(&router, "GET", "/github/active-repositories").await;
    assert_eq!(active.body, json!(["svc-a", "svc-b"]));
}

#[tokio::test]
async fn partial_failure_is_bad_gateway_naming_the_repository() {
    let deps = MockServerDependencies::two_services();
    deps.source.fail_repository(
        "svc-a",
        UpstreamError::unavailable(UpstreamService::Github, "connection reset"),
    );
    let router = deps.router();

    let sync = send(&router, "POST", "/github/sync").await;
    assert_eq!(sync.status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        sync.headers["content-type"],
        "application/problem+json"
    );
    assert_eq!(sync.body["status"], 502);
    assert!(sync.body["errors"]["svc-a"][0]
        .as_str()
        .unwrap()
        .contains("connection reset"));
    assert_eq!(sync.body["report"]["status"], "partial_failure");
    assert_eq!(sync.body["report"]["repositories"], json!(["svc-b"]));

    // The healthy repository was still written.
    assert!(deps.store.get("svc-b").await.unwrap().is_some());
}

#[tokio::test]
async fn store_only_failures_are_internal_errors() {
    let deps = MockServerDependencies::two_services();
    deps.store.reject_writes_for("svc-b").await;
    let router = deps.router();

    let sync = send(&router, "POST", "/github/sync").await;
    assert_eq!(sync.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        sync.body["report"]["failures"][0]["kind"],
        "store_write_failure"
    );
}

#[tokio::test]
async fn rate_limited_listing_is_service_unavailable_with_retry_after() {
    let deps = MockServerDependencies::two_services();
    deps.source.fail_listing(UpstreamError::RateLimited {
        service: UpstreamService::Github,
        retry_after_secs: Some(90),
    });
    let router = deps.router();

    let sync = send(&router, "POST", "/github/sync").await;
    assert_eq!(sync.status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(sync.headers["retry-after"], "90");
    assert_eq!(sync.body["title"], "Upstream Rate Limited");
    assert!(deps.store.is_empty().await);
}

#[tokio::test]
async fn batch_size_is_validated_before_any_upstream_call() {
    let deps = MockServerDependencies::two_services();
    let router = deps.router();

    let zero = send(&router, "POST", "/github/sync?batch_size=0").await;
    assert_eq!(zero.status, StatusCode::BAD_REQUEST);
    assert!(zero.body["errors"]["batch_size"].is_array());

    let too_big = send(&router, "POST", "/github/sync?batch_size=51").await;
    assert_eq!(too_big.status, StatusCode::BAD_REQUEST);

    let garbage = send(&router, "POST", "/github/sync?batch_size=lots").await;
    assert_eq!(garbage.status, StatusCode::BAD_REQUEST);
    assert_eq!(garbage.body["title"], "Bad Request");

    assert_eq!(deps.source.detail_calls(), 0);
    assert!(deps.store.is_empty().await);

    let ok = send(&router, "POST", "/github/sync?batch_size=1").await;
    assert_eq!(ok.status, StatusCode::OK);
}

#[tokio::test]
async fn single_repository_sync() {
    let deps = MockServerDependencies::two_services();
    let router = deps.router();

    let ok = send(&router, "POST", "/github/sync/svc-a").await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["repositories"], json!(["svc-a"]));
    assert!(deps.store.get("svc-b").await.unwrap().is_none());

    let missing = send(&router, "POST", "/github/sync/svc-gone").await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let invalid = send(&router, "POST", "/github/sync/bad%20name").await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert!(invalid.body["detail"].as_str().unwrap().contains("invalid character"));
}

#[tokio::test]
async fn catalog_diagnostic() {
    let deps = MockServerDependencies::new(FakeSourceClient::new(), FakeCatalogClient::new());
    let router = deps.router();

    let ok = send(&router, "GET", "/github/test").await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body, json!({ "reachable": true }));

    deps.catalog.set_ping_result(Ok(false));
    let down = send(&router, "GET", "/github/test").await;
    assert_eq!(down.body, json!({ "reachable": false }));

    deps.catalog.set_ping_result(Err(UpstreamError::unavailable(
        UpstreamService::Catalog,
        "authentication rejected (HTTP 401)",
    )));
    let rejected = send(&router, "GET", "/github/test").await;
    assert_eq!(rejected.status, StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn rate_limit_passthrough() {
    let deps = MockServerDependencies::two_services();
    let router = deps.router();

    let response = send(&router, "GET", "/github/rate-limit").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["limit"], 5000);
    assert!(response.body["resets_at"].is_string());
}
