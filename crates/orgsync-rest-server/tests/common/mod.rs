// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use orgsync_rest_server::{AppState, Server, ServerConfig};
use orgsync_store::InMemoryRepositoryStore;
use orgsync_upstream::fake::{FakeCatalogClient, FakeSourceClient};
use orgsync_upstream::Secret;
use serde_json::Value;
use tower::ServiceExt;

/// Fakes for both upstream platforms over an in-process store
pub struct MockServerDependencies {
    pub source: Arc<FakeSourceClient>,
    pub catalog: Arc<FakeCatalogClient>,
    pub store: Arc<InMemoryRepositoryStore>,
    pub config: ServerConfig,
}

impl MockServerDependencies {
    pub fn new(source: FakeSourceClient, catalog: FakeCatalogClient) -> Self {
        Self {
            source: Arc::new(source),
            catalog: Arc::new(catalog),
            store: Arc::new(InMemoryRepositoryStore::new()),
            config: ServerConfig {
                github_org: "acme".to_string(),
                github_token: Secret::new("ghp_test"),
                backstage_token: Secret::new("bs_test"),
                ..Default::default()
            },
        }
    }

    /// `svc-a` is fully integrated; `svc-b` is bare
    pub fn two_services() -> Self {
        Self::new(
            FakeSourceClient::new()
                .with_repository("svc-a", true, &["alice", "bob"], true)
                .with_repository("svc-b", true, &[], false),
            FakeCatalogClient::new().with_integration("svc-a"),
        )
    }

    pub fn state(&self) -> AppState {
        AppState::new(
            self.config.clone(),
            self.source.clone(),
            self.catalog.clone(),
            self.store.clone(),
        )
    }

    pub fn router(&self) -> Router {
        Server::with_state(self.config.clone(), self.state()).router()
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub async fn send(router: &Router, method: &str, uri: &str) -> TestResponse {
    send_request(
        router,
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn send_request(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    TestResponse {
        status,
        headers,
        body,
    }
}
