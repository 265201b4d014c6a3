// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use orgsync_domain_types::SyncFailureKind;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document store error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// A stored document could not be mapped to a record
    #[error("stored document for '{name}' is malformed: {message}")]
    Serialization { name: String, message: String },

    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Every store failure surfaces as a write failure for the affected record
    pub fn failure_kind(&self) -> SyncFailureKind {
        SyncFailureKind::StoreWriteFailure
    }
}
