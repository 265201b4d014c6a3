// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Repository-related domain types
//!
//! `RepositorySummary` is what the organization listing tells us about a
//! repository; `RepositoryRecord` is the normalized snapshot we persist.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A repository as seen in the organization listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub is_active: bool,
}

impl RepositorySummary {
    pub fn new(name: impl Into<String>, is_active: bool) -> Self {
        Self {
            name: name.into(),
            is_active,
        }
    }
}

/// Normalized repository snapshot, keyed by `name`
///
/// Every field except `name` is replaced wholesale on each sync; the record
/// keeps no history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct RepositoryRecord {
    pub name: String,
    #[cfg_attr(feature = "utoipa", schema(value_type = Vec<String>))]
    #[serde(default)]
    pub contributors: BTreeSet<String>,
    pub has_automation: bool,
    pub has_catalog_integration: bool,
    pub is_active: bool,
    #[cfg_attr(feature = "utoipa", schema(value_type = String, format = DateTime))]
    pub last_synced_at: DateTime<Utc>,
}

impl RepositoryRecord {
    /// Assemble a record from the pieces gathered during one sync
    pub fn from_parts(
        summary: &RepositorySummary,
        contributors: BTreeSet<String>,
        has_automation: bool,
        has_catalog_integration: bool,
        synced_at: DateTime<Utc>,
    ) -> Self {
        Self {
            name: summary.name.clone(),
            contributors,
            has_automation,
            has_catalog_integration,
            is_active: summary.is_active,
            last_synced_at: synced_at,
        }
    }
}
