use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Database, IndexModel,
};

use crate::error::StoreError;

pub const WATCHES_COLLECTION: &str = "tracked_collections";
pub const ALERTS_COLLECTION: &str = "price_alerts";

const DUPLICATE_KEY: i32 = 11000;

/// The unique indexes are load-bearing: idempotent `add` relies on the
/// server rejecting duplicates, so failing to create them is fatal.
pub async fn ensure_indexes(db: &Database) -> Result<(), StoreError> {
    // tracked_collections: unique per (owner_id, collection_key)
    {
        let col = db.collection::<mongodb::bson::Document>(WATCHES_COLLECTION);
        let model = IndexModel::builder()
            .keys(doc! { "owner_id": 1, "collection_key": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None).await?;
    }

    // price_alerts: unique per (owner_id, collection_key, threshold)
    {
        let col = db.collection::<mongodb::bson::Document>(ALERTS_COLLECTION);
        let model = IndexModel::builder()
            .keys(doc! { "owner_id": 1, "collection_key": 1, "threshold": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        col.create_index(model, None).await?;
    }

    // price_alerts: evaluator scan
    {
        let col = db.collection::<mongodb::bson::Document>(ALERTS_COLLECTION);
        let model = IndexModel::builder()
            .keys(doc! { "active": 1, "collection_key": 1 })
            .build();

        if let Err(e) = col.create_index(model, None).await {
            tracing::warn!(error = %e, "could not create alert scan index");
        }
    }

    Ok(())
}

pub(crate) fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        &*err.kind,
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY
    )
}
