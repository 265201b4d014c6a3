// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Errors raised while talking to upstream platforms

use orgsync_domain_types::SyncFailureKind;
use std::fmt;
use thiserror::Error;

/// Result alias for upstream calls
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Which upstream platform an error came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamService {
    Github,
    Catalog,
}

impl fmt::Display for UpstreamService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamService::Github => write!(f, "GitHub"),
            UpstreamService::Catalog => write!(f, "catalog"),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum UpstreamError {
    /// Network, authentication or server-side failure
    #[error("{service} unavailable: {message}")]
    Unavailable {
        service: UpstreamService,
        message: String,
    },

    /// The platform asked us to slow down
    #[error("{service} rate limit exceeded")]
    RateLimited {
        service: UpstreamService,
        retry_after_secs: Option<u64>,
    },

    /// The body did not match the shape we expect at the boundary
    #[error("{service} returned an unexpected response: {message}")]
    InvalidResponse {
        service: UpstreamService,
        message: String,
    },
}

impl UpstreamError {
    pub fn unavailable(service: UpstreamService, message: impl Into<String>) -> Self {
        Self::Unavailable {
            service,
            message: message.into(),
        }
    }

    pub fn invalid_response(service: UpstreamService, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            service,
            message: message.into(),
        }
    }

    /// Seconds the platform asked us to wait, when it said
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            UpstreamError::RateLimited {
                retry_after_secs, ..
            } => *retry_after_secs,
            _ => None,
        }
    }

    /// Position of this error in the sync failure taxonomy
    pub fn failure_kind(&self) -> SyncFailureKind {
        match self {
            UpstreamError::RateLimited { .. } => SyncFailureKind::UpstreamRateLimited,
            UpstreamError::Unavailable { .. } | UpstreamError::InvalidResponse { .. } => {
                SyncFailureKind::UpstreamUnavailable
            }
        }
    }
}
