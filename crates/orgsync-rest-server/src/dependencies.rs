// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Dependency wiring for the REST server

use crate::{config::ServerConfig, state::AppState};
use anyhow::{Context, Result};
use orgsync_store::{InMemoryRepositoryStore, MongoRepositoryStore, MongoStoreConfig, RepositoryStore};
use orgsync_upstream::{
    BackstageClient, BackstageConfig, CatalogClient, GithubClient, GithubConfig, SourceClient,
};
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Default dependency builder: GitHub, Backstage and MongoDB
pub struct DefaultServerDependencies {
    state: AppState,
}

impl DefaultServerDependencies {
    /// Build the upstream clients and connect to the document store
    pub async fn new(config: ServerConfig) -> Result<Self> {
        let github = GithubClient::new(GithubConfig {
            api_url: Url::parse(&config.github_api_url)
                .with_context(|| format!("invalid GitHub API URL '{}'", config.github_api_url))?,
            organization: config.github_org.clone(),
            token: config.github_token.clone(),
            timeout: config.upstream_timeout,
        })?;

        let backstage = BackstageClient::new(BackstageConfig {
            base_url: Url::parse(&config.backstage_url)
                .with_context(|| format!("invalid Backstage URL '{}'", config.backstage_url))?,
            token: config.backstage_token.clone(),
            timeout: config.upstream_timeout,
        })?;

        let store: Arc<dyn RepositoryStore> = if config.uses_in_memory_store() {
            warn!("using in-process repository store; records are lost on exit");
            Arc::new(InMemoryRepositoryStore::new())
        } else {
            let mongo = MongoRepositoryStore::connect(&MongoStoreConfig {
                uri: config.store_uri.expose().to_string(),
                database: config.store_database.clone(),
                collection: config.store_collection.clone(),
                server_selection_timeout: config.upstream_timeout,
            })
            .await
            .context("failed to connect to the document store")?;
            Arc::new(mongo)
        };

        info!(
            organization = %config.github_org,
            catalog = %backstage.base_url(),
            "upstream clients configured"
        );

        let source: Arc<dyn SourceClient> = Arc::new(github);
        let catalog: Arc<dyn CatalogClient> = Arc::new(backstage);
        let state = AppState::new(config, source, catalog, store);

        Ok(Self { state })
    }

    /// Consume the dependency builder and return the resulting app state
    pub fn into_state(self) -> AppState {
        self.state
    }
}
