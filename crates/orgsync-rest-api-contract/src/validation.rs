// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Validation helpers for API contract types

use crate::error::ApiContractError;
use crate::types::SyncQuery;
use validator::Validate;

const MAX_REPOSITORY_NAME_LEN: usize = 100;

/// Validate sync query parameters
pub fn validate_sync_query(query: &SyncQuery) -> Result<(), ApiContractError> {
    query.validate()?;
    Ok(())
}

/// Validate a repository name taken from a request path
///
/// Names are 1-100 characters of ASCII letters, digits, `-`, `_` and `.`,
/// and may not be `.` or `..`.
pub fn validate_repository_name(name: &str) -> Result<(), ApiContractError> {
    if name.is_empty() || name.len() > MAX_REPOSITORY_NAME_LEN {
        return Err(ApiContractError::InvalidRepositoryName(format!(
            "repository name must be 1-{} characters, got {}",
            MAX_REPOSITORY_NAME_LEN,
            name.len()
        )));
    }
    if name == "." || name == ".." {
        return Err(ApiContractError::InvalidRepositoryName(format!(
            "'{}' is not a repository name",
            name
        )));
    }
    if let Some(c) = name
        .chars()
        .find(|c| !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_' | '.'))
    {
        return Err(ApiContractError::InvalidRepositoryName(format!(
            "repository name contains invalid character '{}'",
            c
        )));
    }
    Ok(())
}
