// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Repository store
//!
//! A keyed collection of [`RepositoryRecord`]s. Writes are upserts by
//! `name`; reads never touch the upstream platforms. Two backends implement
//! [`RepositoryStore`]: MongoDB for deployments and an in-process map for
//! tests and local runs.
//!
//! [`RepositoryRecord`]: orgsync_domain_types::RepositoryRecord

pub mod error;
pub mod memory;
pub mod mongo;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryRepositoryStore;
pub use mongo::{MongoRepositoryStore, MongoStoreConfig};
pub use store::RepositoryStore;
