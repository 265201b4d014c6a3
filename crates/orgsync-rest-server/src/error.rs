// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server error types and handling

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use orgsync_core::SyncError;
use orgsync_domain_types::{SyncFailureKind, SyncReport};
use orgsync_rest_api_contract::{ApiContractError, ProblemDetails};
use orgsync_store::StoreError;
use orgsync_upstream::UpstreamError;
use std::collections::HashMap;

/// Server result type
pub type ServerResult<T> = Result<T, ServerError>;

const PROBLEM_JSON: &str = "application/problem+json";

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    /// A sync that ran to completion with at least one failed repository
    #[error("Sync finished with {} failed repositories", .0.failed)]
    PartialSync(Box<SyncReport>),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Store(_) | ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Upstream(UpstreamError::RateLimited { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ServerError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ServerError::Validation(_) | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::RepositoryNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::PartialSync(report) => partial_sync_status(report),
        }
    }

    /// Convert error to Problem+JSON response
    pub fn to_problem(&self) -> ProblemDetails {
        let status = self.status();
        let problem = |problem_type: &str, title: &str, detail: String| ProblemDetails {
            problem_type: format!("https://docs.example.com/errors/{}", problem_type),
            title: title.to_string(),
            status: Some(status.as_u16()),
            detail,
            errors: Default::default(),
            report: None,
        };

        match self {
            ServerError::Store(err) => problem(
                "store",
                "Store Error",
                format!("Document store operation failed: {}", err),
            ),
            ServerError::Upstream(err @ UpstreamError::RateLimited { .. }) => {
                problem("upstream-rate-limited", "Upstream Rate Limited", err.to_string())
            }
            ServerError::Upstream(err) => {
                problem("upstream-unavailable", "Upstream Unavailable", err.to_string())
            }
            ServerError::Validation(errors) => ProblemDetails {
                errors: validation_messages(errors),
                ..problem(
                    "validation",
                    "Validation Error",
                    "Request validation failed".to_string(),
                )
            },
            ServerError::BadRequest(msg) => problem("bad-request", "Bad Request", msg.clone()),
            ServerError::RepositoryNotFound(name) => problem(
                "not-found",
                "Repository Not Found",
                format!("Repository '{}' does not exist in the organization", name),
            ),
            ServerError::PartialSync(report) => {
                let mut errors: HashMap<String, Vec<String>> = HashMap::new();
                for failure in &report.failures {
                    errors
                        .entry(failure.repository.clone())
                        .or_default()
                        .push(format!("{}: {}", failure.kind, failure.message));
                }
                ProblemDetails {
                    errors,
                    report: Some(report.as_ref().clone()),
                    ..problem(
                        "sync-incomplete",
                        "Sync Incomplete",
                        format!(
                            "{} of {} repositories failed to synchronize",
                            report.failed, report.processed
                        ),
                    )
                }
            }
            ServerError::Internal(msg) => {
                problem("internal", "Internal Server Error", msg.clone())
            }
        }
    }

    fn retry_after_secs(&self) -> Option<u64> {
        match self {
            ServerError::Upstream(err) => err.retry_after_secs(),
            _ => None,
        }
    }
}

/// Status for a sync that finished with failures, picked by its dominant failure
fn partial_sync_status(report: &SyncReport) -> StatusCode {
    match report.dominant_failure_kind() {
        Some(SyncFailureKind::UpstreamRateLimited) => StatusCode::SERVICE_UNAVAILABLE,
        Some(SyncFailureKind::StoreWriteFailure) => StatusCode::INTERNAL_SERVER_ERROR,
        Some(SyncFailureKind::UpstreamUnavailable) | None => StatusCode::BAD_GATEWAY,
    }
}

fn validation_messages(errors: &validator::ValidationErrors) -> HashMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' check", e.code))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let problem = self.to_problem();
        let mut response = (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static(PROBLEM_JSON))],
            Json(problem),
        )
            .into_response();
        if let Some(secs) = self.retry_after_secs() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(secs));
        }
        response
    }
}

impl From<SyncError> for ServerError {
    fn from(err: SyncError) -> Self {
        match err {
            SyncError::Listing(e) => ServerError::Upstream(e),
            SyncError::RepositoryNotFound(name) => ServerError::RepositoryNotFound(name),
        }
    }
}

impl From<ApiContractError> for ServerError {
    fn from(err: ApiContractError) -> Self {
        match err {
            ApiContractError::Validation(errors) => ServerError::Validation(errors),
            ApiContractError::InvalidRepositoryName(msg) => ServerError::BadRequest(msg),
        }
    }
}

/// Convert any error to ServerError
impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}

/// Convert IO errors
impl From<std::io::Error> for ServerError {
    fn from(err: std::io::Error) -> Self {
        ServerError::Internal(format!("IO error: {}", err))
    }
}
