// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server state management

use crate::config::ServerConfig;
use orgsync_core::{SyncOptions, Synchronizer};
use orgsync_store::RepositoryStore;
use orgsync_upstream::{CatalogClient, SourceClient};
use std::sync::Arc;

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,

    pub store: Arc<dyn RepositoryStore>,
    pub source: Arc<dyn SourceClient>,
    pub catalog: Arc<dyn CatalogClient>,
    pub synchronizer: Synchronizer,
}

impl AppState {
    /// Wire a state from already-built components
    pub fn new(
        config: ServerConfig,
        source: Arc<dyn SourceClient>,
        catalog: Arc<dyn CatalogClient>,
        store: Arc<dyn RepositoryStore>,
    ) -> Self {
        let synchronizer = Synchronizer::new(source.clone(), catalog.clone(), store.clone());
        Self {
            config,
            store,
            source,
            catalog,
            synchronizer,
        }
    }

    /// Sync options for a request, falling back to the configured concurrency
    pub fn sync_options(&self, batch_size: Option<u32>) -> SyncOptions {
        let concurrency = batch_size.map_or(self.config.sync_concurrency, |n| n as usize);
        SyncOptions::with_concurrency(concurrency)
    }
}
