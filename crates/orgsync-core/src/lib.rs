// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Repository synchronization for orgsync.
//!
//! The [`Synchronizer`] reconciles the organization's repository listing
//! with contributor, automation and catalog lookups and upserts one
//! normalized record per repository into the store.

pub mod clock;
pub mod error;
pub mod synchronizer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{SyncError, SyncResult};
pub use synchronizer::{SyncOptions, Synchronizer, DEFAULT_CONCURRENCY, MAX_CONCURRENCY};
