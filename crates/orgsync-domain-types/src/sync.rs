// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Synchronization report types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Overall outcome of a sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Every repository was written
    Success,
    /// Some repositories were written, some failed
    PartialFailure,
    /// Every repository failed
    Failed,
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncStatus::Success => write!(f, "success"),
            SyncStatus::PartialFailure => write!(f, "partial_failure"),
            SyncStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Error taxonomy for a single repository's sync work
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum SyncFailureKind {
    UpstreamUnavailable,
    UpstreamRateLimited,
    StoreWriteFailure,
}

impl std::fmt::Display for SyncFailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncFailureKind::UpstreamUnavailable => write!(f, "upstream_unavailable"),
            SyncFailureKind::UpstreamRateLimited => write!(f, "upstream_rate_limited"),
            SyncFailureKind::StoreWriteFailure => write!(f, "store_write_failure"),
        }
    }
}

/// A repository whose sync work did not complete
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct SyncFailure {
    pub repository: String,
    pub kind: SyncFailureKind,
    pub message: String,
}

/// Summary of one sync run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct SyncReport {
    pub status: SyncStatus,
    #[cfg_attr(feature = "utoipa", schema(value_type = String, format = DateTime))]
    pub started_at: DateTime<Utc>,
    #[cfg_attr(feature = "utoipa", schema(value_type = String, format = DateTime))]
    pub finished_at: DateTime<Utc>,
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Repositories written during this run, sorted by name
    pub repositories: Vec<String>,
    /// Repositories that failed, sorted by name
    pub failures: Vec<SyncFailure>,
}

impl SyncReport {
    /// Build a report from per-repository outcomes in any completion order
    pub fn from_outcomes<I>(
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
        outcomes: I,
    ) -> Self
    where
        I: IntoIterator<Item = Result<String, SyncFailure>>,
    {
        let mut repositories = Vec::new();
        let mut failures = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(name) => repositories.push(name),
                Err(failure) => failures.push(failure),
            }
        }
        repositories.sort();
        failures.sort_by(|a, b| a.repository.cmp(&b.repository));

        let succeeded = repositories.len();
        let failed = failures.len();
        let status = match (succeeded, failed) {
            (_, 0) => SyncStatus::Success,
            (0, _) => SyncStatus::Failed,
            _ => SyncStatus::PartialFailure,
        };

        Self {
            status,
            started_at,
            finished_at,
            processed: succeeded + failed,
            succeeded,
            failed,
            repositories,
            failures,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SyncStatus::Success
    }

    /// The most severe failure kind, if any
    ///
    /// Rate limiting outranks unavailability, which outranks store failures.
    /// A store failure is only dominant when nothing else went wrong.
    pub fn dominant_failure_kind(&self) -> Option<SyncFailureKind> {
        let kinds = || self.failures.iter().map(|f| f.kind);
        [
            SyncFailureKind::UpstreamRateLimited,
            SyncFailureKind::UpstreamUnavailable,
            SyncFailureKind::StoreWriteFailure,
        ]
        .into_iter()
        .find(|candidate| kinds().any(|k| k == *candidate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(repo: &str, kind: SyncFailureKind) -> SyncFailure {
        SyncFailure {
            repository: repo.to_string(),
            kind,
            message: "boom".to_string(),
        }
    }

    #[test]
    fn all_ok_is_success() {
        let now = Utc::now();
        let report =
            SyncReport::from_outcomes(now, now, vec![Ok("b".to_string()), Ok("a".to_string())]);
        assert_eq!(report.status, SyncStatus::Success);
        assert_eq!(report.repositories, vec!["a", "b"]);
        assert_eq!(report.processed, 2);
        assert!(report.dominant_failure_kind().is_none());
    }

    #[test]
    fn empty_run_is_success() {
        let now = Utc::now();
        let report = SyncReport::from_outcomes(now, now, Vec::new());
        assert!(report.is_success());
        assert_eq!(report.processed, 0);
    }

    #[test]
    fn mixed_outcomes_are_partial_and_name_the_failure() {
        let now = Utc::now();
        let report = SyncReport::from_outcomes(
            now,
            now,
            vec![
                Ok("svc-y".to_string()),
                Err(failure("svc-x", SyncFailureKind::UpstreamUnavailable)),
            ],
        );
        assert_eq!(report.status, SyncStatus::PartialFailure);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.failures[0].repository, "svc-x");
    }

    #[test]
    fn only_failures_is_failed() {
        let now = Utc::now();
        let report = SyncReport::from_outcomes(
            now,
            now,
            vec![Err(failure("svc-x", SyncFailureKind::StoreWriteFailure))],
        );
        assert_eq!(report.status, SyncStatus::Failed);
    }

    #[test]
    fn rate_limiting_dominates() {
        let now = Utc::now();
        let report = SyncReport::from_outcomes(
            now,
            now,
            vec![
                Err(failure("a", SyncFailureKind::StoreWriteFailure)),
                Err(failure("b", SyncFailureKind::UpstreamRateLimited)),
                Err(failure("c", SyncFailureKind::UpstreamUnavailable)),
            ],
        );
        assert_eq!(
            report.dominant_failure_kind(),
            Some(SyncFailureKind::UpstreamRateLimited)
        );
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(SyncStatus::PartialFailure).unwrap(),
            serde_json::json!("partial_failure")
        );
        assert_eq!(SyncStatus::Success.to_string(), "success");
    }
}
