use crate::{
    error::CommandError,
    models::{parse_collection_key, OwnerId},
    AppState,
};

/// Verifies the collection exists upstream, then records the watch.
/// Returns false if the owner was already watching it.
pub async fn add_watch(state: &AppState, owner_id: OwnerId, collection: &str) -> Result<bool, CommandError> {
    let key = parse_collection_key(collection).ok_or(CommandError::InvalidCollection)?;

    state.prices.fetch(&key).await?;

    let added = state.watches.add(owner_id, &key).await?;
    tracing::info!(owner_id, collection = %key, added, "watch add");
    Ok(added)
}

pub async fn remove_watch(state: &AppState, owner_id: OwnerId, collection: &str) -> Result<bool, CommandError> {
    let key = parse_collection_key(collection).ok_or(CommandError::InvalidCollection)?;

    Ok(state.watches.remove(owner_id, &key).await?)
}

pub async fn list_watches(state: &AppState, owner_id: OwnerId) -> Result<Vec<String>, CommandError> {
    Ok(state.watches.list_for(owner_id).await?)
}
