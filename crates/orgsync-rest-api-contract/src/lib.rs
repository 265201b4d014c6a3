// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! orgsync REST API contract types and validation
//!
//! Wire types shared by the server and its tests. Stored records and sync
//! reports are served as the domain types themselves.

pub mod error;
pub mod types;
pub mod validation;

pub use error::*;
pub use types::*;
pub use validation::*;

/// Generate OpenAPI schema for the API contract types
#[cfg(feature = "utoipa")]
pub fn openapi_schema() -> utoipa::openapi::OpenApi {
    use orgsync_domain_types::{
        RateLimitStatus, RepositoryRecord, SyncFailure, SyncFailureKind, SyncReport, SyncStatus,
    };
    use utoipa::OpenApi;

    #[derive(OpenApi)]
    #[openapi(
        info(title = "orgsync REST API"),
        paths(),
        components(schemas(
            RepositoryRecord,
            SyncStatus,
            SyncFailureKind,
            SyncFailure,
            SyncReport,
            RateLimitStatus,
            SyncQuery,
            PingResponse,
            HealthStatus,
            ServiceHealth,
            HealthResponse,
            VersionResponse,
            BuildInfo,
            ProblemDetails
        ))
    )]
    struct ApiDoc;
    ApiDoc::openapi()
}
