use async_trait::async_trait;
use futures_util::StreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::FindOptions;
use mongodb::{Collection, Database};

use crate::{
    error::StoreError,
    models::{normalize_collection_key, OwnerId, TrackedCollection},
};

use super::db_init::{is_duplicate_key, WATCHES_COLLECTION};

/// Durable (owner, collection) watches. Keys are lowercased on the way in.
#[async_trait]
pub trait WatchStore: Send + Sync {
    /// Returns false when the owner already watches the collection.
    async fn add(&self, owner_id: OwnerId, collection_key: &str) -> Result<bool, StoreError>;

    /// Returns true if a row was removed.
    async fn remove(&self, owner_id: OwnerId, collection_key: &str) -> Result<bool, StoreError>;

    async fn list_for(&self, owner_id: OwnerId) -> Result<Vec<String>, StoreError>;

    async fn list_all(&self) -> Result<Vec<(OwnerId, String)>, StoreError>;
}

#[derive(Clone)]
pub struct MongoWatchStore {
    watches: Collection<TrackedCollection>,
}

impl MongoWatchStore {
    pub fn new(db: &Database) -> Self {
        Self {
            watches: db.collection::<TrackedCollection>(WATCHES_COLLECTION),
        }
    }

    async fn find(&self, filter: Document) -> Result<Vec<TrackedCollection>, StoreError> {
        let find_opts = FindOptions::builder().sort(doc! { "added_at": 1 }).build();

        let mut cursor = self.watches.find(filter, find_opts).await?;

        let mut items = Vec::new();
        while let Some(res) = cursor.next().await {
            items.push(res?);
        }

        Ok(items)
    }
}

#[async_trait]
impl WatchStore for MongoWatchStore {
    async fn add(&self, owner_id: OwnerId, collection_key: &str) -> Result<bool, StoreError> {
        let watch = TrackedCollection::new(owner_id, collection_key);

        match self.watches.insert_one(&watch, None).await {
            Ok(_) => Ok(true),
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn remove(&self, owner_id: OwnerId, collection_key: &str) -> Result<bool, StoreError> {
        let key = normalize_collection_key(collection_key);

        let res = self
            .watches
            .delete_one(doc! { "owner_id": owner_id, "collection_key": &key }, None)
            .await?;

        Ok(res.deleted_count > 0)
    }

    async fn list_for(&self, owner_id: OwnerId) -> Result<Vec<String>, StoreError> {
        let items = self.find(doc! { "owner_id": owner_id }).await?;
        Ok(items.into_iter().map(|w| w.collection_key).collect())
    }

    async fn list_all(&self) -> Result<Vec<(OwnerId, String)>, StoreError> {
        let items = self.find(doc! {}).await?;
        Ok(items
            .into_iter()
            .map(|w| (w.owner_id, w.collection_key))
            .collect())
    }
}
