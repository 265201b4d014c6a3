// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Domain types for orgsync
//!
//! This crate contains the types shared by the upstream clients, the
//! repository store, the synchronizer and the REST API. They carry no
//! behaviour beyond small derived views.

pub mod rate_limit;
pub mod repository;
pub mod sync;

// Re-export commonly used types
pub use rate_limit::*;
pub use repository::*;
pub use sync::*;
