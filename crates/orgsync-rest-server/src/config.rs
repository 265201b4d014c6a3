// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server configuration
//!
//! Every setting is a command-line flag backed by an environment variable.
//! Values are read once at start-up and handed to each component's
//! constructor; nothing reads the environment afterwards.

use clap::Parser;
use orgsync_core::DEFAULT_CONCURRENCY;
use orgsync_logging::CliLoggingArgs;
use orgsync_upstream::github::DEFAULT_API_URL;
use orgsync_upstream::Secret;
use std::net::{Ipv4Addr, SocketAddr};
use std::time::Duration;

/// Store URI that selects the in-process store instead of MongoDB
pub const IN_MEMORY_STORE: &str = ":memory:";

/// Command-line arguments of `orgsync-server`
#[derive(Parser, Debug, Clone)]
#[command(name = "orgsync-server", author, version, about, long_about = None)]
pub struct ServerArgs {
    /// Bind address for the server
    #[arg(long, env = "ORGSYNC_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,

    /// GitHub organization to synchronize
    #[arg(long, env = "GITHUB_ORG")]
    pub github_org: String,

    /// GitHub access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Secret,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub github_api_url: String,

    /// MongoDB connection string, or `:memory:` for an in-process store
    #[arg(long, env = "MONGO_STRING_CONNECTION", hide_env_values = true)]
    pub mongo_uri: Secret,

    /// MongoDB database name
    #[arg(long, env = "MONGO_DATABASE", default_value = "repositories")]
    pub mongo_database: String,

    /// MongoDB collection holding repository records
    #[arg(long, env = "MONGO_COLLECTION_NAME", default_value = "repositories")]
    pub mongo_collection: String,

    /// Backstage base URL, including any path prefix
    #[arg(long, env = "BACKSTAGE_URL")]
    pub backstage_url: String,

    /// Backstage access token
    #[arg(long, env = "BACKSTAGE_TOKEN", hide_env_values = true)]
    pub backstage_token: Secret,

    /// Allowed CORS origins, comma separated; `*` allows any origin
    #[arg(long, env = "CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,

    /// Repositories synchronized concurrently when a request does not say
    #[arg(long, env = "SYNC_CONCURRENCY", default_value_t = 10,
          value_parser = clap::value_parser!(u32).range(1..=50))]
    pub sync_concurrency: u32,

    /// Timeout for each upstream HTTP request, in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 10)]
    pub upstream_timeout_secs: u64,

    #[command(flatten)]
    pub logging: CliLoggingArgs,
}

impl ServerArgs {
    pub fn into_config(self) -> ServerConfig {
        ServerConfig {
            bind_addr: self.bind,
            github_org: self.github_org,
            github_token: self.github_token,
            github_api_url: self.github_api_url,
            store_uri: self.mongo_uri,
            store_database: self.mongo_database,
            store_collection: self.mongo_collection,
            backstage_url: self.backstage_url,
            backstage_token: self.backstage_token,
            cors_origins: self
                .cors_origins
                .into_iter()
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect(),
            sync_concurrency: self.sync_concurrency as usize,
            upstream_timeout: Duration::from_secs(self.upstream_timeout_secs),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,

    pub github_org: String,
    pub github_token: Secret,
    pub github_api_url: String,

    /// MongoDB connection string, or [`IN_MEMORY_STORE`]
    pub store_uri: Secret,
    pub store_database: String,
    pub store_collection: String,

    pub backstage_url: String,
    pub backstage_token: Secret,

    /// Allowed CORS origins; `*` allows any, empty allows none
    pub cors_origins: Vec<String>,

    /// Default per-sync concurrency
    pub sync_concurrency: usize,

    pub upstream_timeout: Duration,
}

impl ServerConfig {
    pub fn uses_in_memory_store(&self) -> bool {
        self.store_uri.expose() == IN_MEMORY_STORE
    }

    /// One start-up line describing the configuration; secrets print masked
    pub fn log_startup(&self) {
        tracing::info!(
            bind = %self.bind_addr,
            organization = %self.github_org,
            github_token = %self.github_token,
            store = %self.store_uri,
            backstage_token = %self.backstage_token,
            in_memory_store = self.uses_in_memory_store(),
            "Starting orgsync REST API server"
        );
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::LOCALHOST, 8000)),
            github_org: String::new(),
            github_token: Secret::default(),
            github_api_url: DEFAULT_API_URL.to_string(),
            store_uri: Secret::new(IN_MEMORY_STORE),
            store_database: "repositories".to_string(),
            store_collection: "repositories".to_string(),
            backstage_url: "http://127.0.0.1:7007".to_string(),
            backstage_token: Secret::default(),
            cors_origins: Vec::new(),
            sync_concurrency: DEFAULT_CONCURRENCY,
            upstream_timeout: Duration::from_secs(10),
        }
    }
}
