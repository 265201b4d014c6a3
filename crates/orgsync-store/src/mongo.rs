// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! MongoDB-backed store
//!
//! Documents mirror [`RepositoryRecord`] field for field, except that the
//! sync timestamp is stored as a native BSON date so it sorts and filters
//! server-side.

use crate::error::{StoreError, StoreResult};
use crate::store::RepositoryStore;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use orgsync_domain_types::RepositoryRecord;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const APP_NAME: &str = "orgsync";

/// Connection settings for [`MongoRepositoryStore`]
#[derive(Debug, Clone)]
pub struct MongoStoreConfig {
    pub uri: String,
    pub database: String,
    pub collection: String,
    /// How long to wait for a reachable server before failing an operation
    pub server_selection_timeout: Duration,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RepositoryDocument {
    name: String,
    #[serde(default)]
    contributors: Vec<String>,
    has_automation: bool,
    has_catalog_integration: bool,
    is_active: bool,
    last_synced_at: bson::DateTime,
}

impl From<&RepositoryRecord> for RepositoryDocument {
    fn from(record: &RepositoryRecord) -> Self {
        Self {
            name: record.name.clone(),
            contributors: record.contributors.iter().cloned().collect(),
            has_automation: record.has_automation,
            has_catalog_integration: record.has_catalog_integration,
            is_active: record.is_active,
            last_synced_at: bson::DateTime::from_millis(record.last_synced_at.timestamp_millis()),
        }
    }
}

impl TryFrom<RepositoryDocument> for RepositoryRecord {
    type Error = StoreError;

    fn try_from(doc: RepositoryDocument) -> Result<Self, Self::Error> {
        let millis = doc.last_synced_at.timestamp_millis();
        let last_synced_at = Utc.timestamp_millis_opt(millis).single().ok_or_else(|| {
            StoreError::Serialization {
                name: doc.name.clone(),
                message: format!("last_synced_at {millis}ms is out of range"),
            }
        })?;

        Ok(RepositoryRecord {
            name: doc.name,
            contributors: doc.contributors.into_iter().collect(),
            has_automation: doc.has_automation,
            has_catalog_integration: doc.has_catalog_integration,
            is_active: doc.is_active,
            last_synced_at,
        })
    }
}

#[derive(Debug, Deserialize)]
struct NameOnly {
    name: String,
}

/// Store over one MongoDB collection
///
/// Holds the process-wide client handle; it is released when the store is
/// dropped.
#[derive(Debug, Clone)]
pub struct MongoRepositoryStore {
    database: Database,
    collection: Collection<RepositoryDocument>,
}

impl MongoRepositoryStore {
    /// Connect, verify the server answers, and ensure the unique name index
    pub async fn connect(config: &MongoStoreConfig) -> StoreResult<Self> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some(APP_NAME.to_string());
        options.server_selection_timeout = Some(config.server_selection_timeout);
        let client = Client::with_options(options)?;

        let database = client.database(&config.database);
        let store = Self {
            collection: database.collection(&config.collection),
            database,
        };
        store.ping().await?;
        store.ensure_indexes().await?;

        info!(
            database = %config.database,
            collection = %config.collection,
            "connected to document store"
        );
        Ok(store)
    }

    async fn ensure_indexes(&self) -> StoreResult<()> {
        let index = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection.create_index(index).await?;
        debug!("ensured unique index on name");
        Ok(())
    }
}

#[async_trait]
impl RepositoryStore for MongoRepositoryStore {
    async fn upsert(&self, record: &RepositoryRecord) -> StoreResult<()> {
        let document = RepositoryDocument::from(record);
        self.collection
            .replace_one(doc! { "name": record.name.as_str() }, &document)
            .upsert(true)
            .await?;
        debug!(repository = %record.name, "upserted repository record");
        Ok(())
    }

    async fn list_all(&self) -> StoreResult<Vec<RepositoryRecord>> {
        let documents: Vec<RepositoryDocument> = self
            .collection
            .find(doc! {})
            .sort(doc! { "name": 1 })
            .await?
            .try_collect()
            .await?;
        documents.into_iter().map(RepositoryRecord::try_from).collect()
    }

    async fn list_active_names(&self) -> StoreResult<Vec<String>> {
        let names: Vec<NameOnly> = self
            .collection
            .clone_with_type::<NameOnly>()
            .find(doc! { "is_active": true })
            .projection(doc! { "name": 1, "_id": 0 })
            .sort(doc! { "name": 1 })
            .await?
            .try_collect()
            .await?;
        Ok(names.into_iter().map(|n| n.name).collect())
    }

    async fn get(&self, name: &str) -> StoreResult<Option<RepositoryRecord>> {
        self.collection
            .find_one(doc! { "name": name })
            .await?
            .map(RepositoryRecord::try_from)
            .transpose()
    }

    async fn ping(&self) -> StoreResult<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
