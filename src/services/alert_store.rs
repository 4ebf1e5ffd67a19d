use async_trait::async_trait;
use chrono::Utc;
use futures_util::StreamExt;
use mongodb::bson::doc;
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};

use crate::{
    error::StoreError,
    models::{normalize_collection_key, AlertDirection, OwnerId, PriceAlert},
};

use super::db_init::{is_duplicate_key, ALERTS_COLLECTION};

/// Durable (owner, collection, threshold) alerts. Each write touches exactly
/// one record, so no cross-record transactions are needed.
#[async_trait]
pub trait AlertStore: Send + Sync {
    /// Returns false (not an error) when the same (owner, collection,
    /// threshold) alert already exists.
    async fn add(
        &self,
        owner_id: OwnerId,
        collection_key: &str,
        threshold: f64,
        direction: AlertDirection,
    ) -> Result<bool, StoreError>;

    async fn list_active_for(&self, owner_id: OwnerId) -> Result<Vec<PriceAlert>, StoreError>;

    async fn list_all_active(&self) -> Result<Vec<PriceAlert>, StoreError>;

    /// Returns true only if an active row was flipped. A missing or already
    /// inactive row is a no-op.
    async fn deactivate(
        &self,
        owner_id: OwnerId,
        collection_key: &str,
        threshold: f64,
    ) -> Result<bool, StoreError>;

    /// Removes every alert the owner holds on the collection.
    async fn remove(&self, owner_id: OwnerId, collection_key: &str) -> Result<u64, StoreError>;
}

#[derive(Clone)]
pub struct MongoAlertStore {
    alerts: Collection<PriceAlert>,
}

impl MongoAlertStore {
    pub fn new(db: &Database) -> Self {
        Self {
            alerts: db.collection::<PriceAlert>(ALERTS_COLLECTION),
        }
    }

    async fn find(&self, filter: mongodb::bson::Document) -> Result<Vec<PriceAlert>, StoreError> {
        let find_opts = FindOptions::builder()
            .sort(doc! { "created_at": 1 })
            .build();

        let mut cursor = self.alerts.find(filter, find_opts).await?;

        let mut items: Vec<PriceAlert> = Vec::new();
        while let Some(res) = cursor.next().await {
            items.push(res?);
        }

        Ok(items)
    }
}

#[async_trait]
impl AlertStore for MongoAlertStore {
    async fn add(
        &self,
        owner_id: OwnerId,
        collection_key: &str,
        threshold: f64,
        direction: AlertDirection,
    ) -> Result<bool, StoreError> {
        let alert = PriceAlert::new(owner_id, collection_key, threshold, direction);

        match self.alerts.insert_one(&alert, None).await {
            Ok(_) => Ok(true),
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_active_for(&self, owner_id: OwnerId) -> Result<Vec<PriceAlert>, StoreError> {
        self.find(doc! { "owner_id": owner_id, "active": true }).await
    }

    async fn list_all_active(&self) -> Result<Vec<PriceAlert>, StoreError> {
        self.find(doc! { "active": true }).await
    }

    async fn deactivate(
        &self,
        owner_id: OwnerId,
        collection_key: &str,
        threshold: f64,
    ) -> Result<bool, StoreError> {
        let key = normalize_collection_key(collection_key);
        let now = Utc::now().timestamp();

        let res = self
            .alerts
            .update_one(
                doc! {
                    "owner_id": owner_id,
                    "collection_key": &key,
                    "threshold": threshold,
                    "active": true,
                },
                doc! { "$set": { "active": false, "triggered_at": now } },
                None,
            )
            .await?;

        Ok(res.modified_count > 0)
    }

    async fn remove(&self, owner_id: OwnerId, collection_key: &str) -> Result<u64, StoreError> {
        let key = normalize_collection_key(collection_key);

        let res = self
            .alerts
            .delete_many(doc! { "owner_id": owner_id, "collection_key": &key }, None)
            .await?;

        Ok(res.deleted_count)
    }
}
