// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Request and response bodies

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::Validate;

/// Query parameters for `POST /github/sync`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct SyncQuery {
    /// Repositories processed concurrently; server default when absent
    #[validate(range(min = 1, max = 50))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,
}

/// Result of the catalog connectivity diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct PingResponse {
    pub reachable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct ServiceHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServiceHealth {
    pub fn healthy() -> Self {
        Self {
            status: HealthStatus::Healthy,
            error: None,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: HealthStatus::Unhealthy,
            error: Some(error.into()),
        }
    }
}

/// Health check response
///
/// `status` is `unhealthy` as soon as any service is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub services: BTreeMap<String, ServiceHealth>,
    #[cfg_attr(feature = "utoipa", schema(value_type = String, format = DateTime))]
    pub timestamp: DateTime<Utc>,
}

impl HealthResponse {
    pub fn from_services(services: BTreeMap<String, ServiceHealth>, timestamp: DateTime<Utc>) -> Self {
        let status = if services.values().all(|s| s.status == HealthStatus::Healthy) {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        };
        Self {
            status,
            services,
            timestamp,
        }
    }
}

/// Version response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct VersionResponse {
    pub version: String,
    pub build_info: BuildInfo,
}

/// Build information
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct BuildInfo {
    pub git_commit: Option<String>,
    pub build_date: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_unhealthy_service_makes_the_whole_unhealthy() {
        let mut services = BTreeMap::new();
        services.insert("store".to_string(), ServiceHealth::healthy());
        let healthy = HealthResponse::from_services(services.clone(), Utc::now());
        assert_eq!(healthy.status, HealthStatus::Healthy);

        services.insert("github".to_string(), ServiceHealth::unhealthy("no token"));
        let unhealthy = HealthResponse::from_services(services, Utc::now());
        assert_eq!(unhealthy.status, HealthStatus::Unhealthy);

        let json = serde_json::to_value(&unhealthy).unwrap();
        assert_eq!(json["status"], "unhealthy");
        assert_eq!(json["services"]["github"]["error"], "no token");
        assert!(json["services"]["store"].get("error").is_none());
    }
}
