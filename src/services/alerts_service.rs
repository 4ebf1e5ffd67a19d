use crate::{
    error::CommandError,
    models::{parse_collection_key, AlertDirection, OwnerId, PriceAlert},
    AppState,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SetAlertOutcome {
    pub collection_key: String,
    pub threshold: f64,
    pub direction: AlertDirection,
    // false when the same (collection, threshold) alert already existed
    pub created: bool,
}

pub async fn set_alert(
    state: &AppState,
    owner_id: OwnerId,
    collection: &str,
    threshold: f64,
    direction: AlertDirection,
) -> Result<SetAlertOutcome, CommandError> {
    let key = parse_collection_key(collection).ok_or(CommandError::InvalidCollection)?;

    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(CommandError::InvalidThreshold);
    }

    // Refuse alerts on collections the marketplace doesn't know about.
    state.prices.fetch(&key).await?;

    let created = state.alerts.add(owner_id, &key, threshold, direction).await?;
    tracing::info!(owner_id, collection = %key, threshold, %direction, created, "alert set");

    Ok(SetAlertOutcome {
        collection_key: key,
        threshold,
        direction,
        created,
    })
}

pub async fn list_alerts(state: &AppState, owner_id: OwnerId) -> Result<Vec<PriceAlert>, CommandError> {
    Ok(state.alerts.list_active_for(owner_id).await?)
}

/// Drops all of the owner's alerts on a collection. Returns how many went.
pub async fn remove_alerts(state: &AppState, owner_id: OwnerId, collection: &str) -> Result<u64, CommandError> {
    let key = parse_collection_key(collection).ok_or(CommandError::InvalidCollection)?;

    let removed = state.alerts.remove(owner_id, &key).await?;
    tracing::info!(owner_id, collection = %key, removed, "alerts removed");
    Ok(removed)
}
