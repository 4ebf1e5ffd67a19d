use serde::Serialize;

use crate::{
    error::{CommandError, FetchError},
    models::{parse_collection_key, CollectionInfo, CollectionSnapshot, OwnerId},
    AppState,
};

#[derive(Debug, Clone, Serialize)]
pub struct FloorReport {
    pub snapshot: CollectionSnapshot,
    pub info: Option<CollectionInfo>,
}

#[derive(Debug, Clone)]
pub struct CheckEntry {
    pub collection_key: String,
    pub result: Result<CollectionSnapshot, FetchError>,
}

/// On-demand lookup: stats and metadata fetched concurrently. Only a stats
/// failure fails the lookup; missing metadata just degrades the report.
pub async fn floor_lookup(state: &AppState, collection: &str) -> Result<FloorReport, CommandError> {
    let key = parse_collection_key(collection).ok_or(CommandError::InvalidCollection)?;

    let (stats, info) = state.prices.fetch_detailed(&key).await;
    let snapshot = stats?;

    let info = match info {
        Ok(i) => Some(i),
        Err(e) => {
            tracing::debug!(collection = %key, kind = e.kind(), "collection info unavailable");
            None
        }
    };

    Ok(FloorReport { snapshot, info })
}

/// One Price Source call per watched collection, in order. Per-entry
/// failures are reported inline.
pub async fn check_watched(state: &AppState, owner_id: OwnerId) -> Result<Vec<CheckEntry>, CommandError> {
    let keys = state.watches.list_for(owner_id).await?;

    let mut entries = Vec::with_capacity(keys.len());
    for key in keys {
        let result = state.prices.fetch(&key).await;
        if let Err(e) = &result {
            tracing::warn!(owner_id, collection = %key, kind = e.kind(), "check lookup failed");
        }
        entries.push(CheckEntry {
            collection_key: key,
            result,
        });
    }

    Ok(entries)
}
