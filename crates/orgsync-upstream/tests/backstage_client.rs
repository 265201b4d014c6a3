// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use std::collections::HashMap;
use std::time::Duration;

use axum::{
    extract::Query,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use orgsync_upstream::{BackstageClient, BackstageConfig, CatalogClient, Secret, UpstreamError};
use serde_json::json;
use url::Url;

async fn spawn_fake_catalog(app: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve fake catalog");
    });
    Url::parse(&format!("http://{addr}/backstage")).expect("url")
}

fn client(base_url: Url, token: &str) -> BackstageClient {
    BackstageClient::new(BackstageConfig {
        base_url,
        token: Secret::new(token),
        timeout: Duration::from_secs(5),
    })
    .expect("client")
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "Bearer catalog-token")
}

fn catalog_app() -> Router {
    Router::new()
        .route(
            "/backstage/api/catalog/locations",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return StatusCode::UNAUTHORIZED.into_response();
                }
                Json(json!([
                    {
                        "data": {
                            "id": "0b7c",
                            "type": "url",
                            "target": "https://github.com/acme/svc-a/blob/main/catalog-info.yaml"
                        }
                    },
                    {
                        "data": {
                            "id": "4d1e",
                            "type": "url",
                            "target": "https://github.com/acme/Billing-API/blob/main/catalog-info.yaml"
                        }
                    },
                    { "data": { "id": "9f20", "type": "file", "target": "./examples/all.yaml" } }
                ]))
                .into_response()
            }),
        )
        // Entities are named after the service, not the repository.
        .route(
            "/backstage/api/catalog/entities/by-name/:kind/:namespace/:name",
            get(|| async { StatusCode::NOT_FOUND }),
        )
        .route(
            "/backstage/api/catalog/entities",
            get(
                |Query(query): Query<HashMap<String, String>>, headers: HeaderMap| async move {
                    if !authorized(&headers) {
                        return StatusCode::FORBIDDEN.into_response();
                    }
                    assert_eq!(query.get("limit").map(String::as_str), Some("1"));
                    Json(json!([])).into_response()
                },
            ),
        )
}

#[tokio::test]
async fn integration_is_a_registered_location_in_the_repository() {
    let catalog = client(spawn_fake_catalog(catalog_app()).await, "catalog-token");

    assert!(catalog.has_integration("svc-a").await.unwrap());
    assert!(catalog.has_integration("billing-api").await.unwrap());
    assert!(!catalog.has_integration("svc-b").await.unwrap());
}

#[tokio::test]
async fn missing_locations_endpoint_is_not_integrated() {
    let catalog = client(spawn_fake_catalog(Router::new()).await, "catalog-token");

    assert!(!catalog.has_integration("svc-a").await.unwrap());
}

#[tokio::test]
async fn catalog_server_errors_propagate() {
    let app = Router::new().route(
        "/backstage/api/catalog/locations",
        get(|| async { StatusCode::BAD_GATEWAY }),
    );
    let catalog = client(spawn_fake_catalog(app).await, "catalog-token");

    let err = catalog.has_integration("svc-a").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Unavailable { .. }));
}

#[tokio::test]
async fn rejected_token_is_unavailable() {
    let catalog = client(spawn_fake_catalog(catalog_app()).await, "wrong");

    let err = catalog.has_integration("svc-a").await.unwrap_err();
    assert!(matches!(err, UpstreamError::Unavailable { .. }));
}

#[tokio::test]
async fn malformed_locations_are_invalid_response() {
    let app = Router::new().route(
        "/backstage/api/catalog/locations",
        get(|| async { Json(json!({ "items": [] })) }),
    );
    let catalog = client(spawn_fake_catalog(app).await, "catalog-token");

    let err = catalog.has_integration("svc-a").await.unwrap_err();
    assert!(matches!(err, UpstreamError::InvalidResponse { .. }));
}

#[tokio::test]
async fn ping_reports_reachability() {
    let base = spawn_fake_catalog(catalog_app()).await;

    assert!(client(base.clone(), "catalog-token").ping().await.unwrap());

    let err = client(base, "wrong").ping().await.unwrap_err();
    assert!(matches!(err, UpstreamError::Unavailable { .. }));
}

#[tokio::test]
async fn ping_without_catalog_routes_is_not_reachable() {
    let app = Router::new();
    let catalog = client(spawn_fake_catalog(app).await, "catalog-token");

    assert!(!catalog.ping().await.unwrap());
}
