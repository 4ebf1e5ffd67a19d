use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::OwnerId;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedCollection {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub owner_id: OwnerId,
    pub collection_key: String,

    pub added_at: i64,
}

impl TrackedCollection {
    pub fn new(owner_id: OwnerId, collection_key: &str) -> Self {
        Self {
            id: ObjectId::new(),
            owner_id,
            collection_key: super::normalize_collection_key(collection_key),
            added_at: chrono::Utc::now().timestamp(),
        }
    }
}
