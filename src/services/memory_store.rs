use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    error::StoreError,
    models::{normalize_collection_key, AlertDirection, OwnerId, PriceAlert, TrackedCollection},
};

use super::{alert_store::AlertStore, watch_store::WatchStore};

/// Process-local store with the same uniqueness and single-record semantics
/// as the Mongo stores. Not durable; used for tests and local runs.
#[derive(Default)]
pub struct MemoryStore {
    alerts: Mutex<Vec<PriceAlert>>,
    watches: Mutex<Vec<TrackedCollection>>,
}

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    m.lock().map_err(|_| StoreError("memory store lock poisoned".to_string()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every alert, active or not.
    pub fn all_alerts(&self) -> Result<Vec<PriceAlert>, StoreError> {
        Ok(lock(&self.alerts)?.clone())
    }
}

#[async_trait]
impl AlertStore for MemoryStore {
    async fn add(
        &self,
        owner_id: OwnerId,
        collection_key: &str,
        threshold: f64,
        direction: AlertDirection,
    ) -> Result<bool, StoreError> {
        let alert = PriceAlert::new(owner_id, collection_key, threshold, direction);
        let mut alerts = lock(&self.alerts)?;

        let exists = alerts.iter().any(|a| {
            a.owner_id == owner_id
                && a.collection_key == alert.collection_key
                && a.threshold == threshold
        });
        if exists {
            return Ok(false);
        }

        alerts.push(alert);
        Ok(true)
    }

    async fn list_active_for(&self, owner_id: OwnerId) -> Result<Vec<PriceAlert>, StoreError> {
        Ok(lock(&self.alerts)?
            .iter()
            .filter(|a| a.active && a.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn list_all_active(&self) -> Result<Vec<PriceAlert>, StoreError> {
        Ok(lock(&self.alerts)?
            .iter()
            .filter(|a| a.active)
            .cloned()
            .collect())
    }

    async fn deactivate(
        &self,
        owner_id: OwnerId,
        collection_key: &str,
        threshold: f64,
    ) -> Result<bool, StoreError> {
        let key = normalize_collection_key(collection_key);
        let mut alerts = lock(&self.alerts)?;

        let hit = alerts.iter_mut().find(|a| {
            a.active && a.owner_id == owner_id && a.collection_key == key && a.threshold == threshold
        });

        match hit {
            Some(a) => {
                a.active = false;
                a.triggered_at = Some(Utc::now().timestamp());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove(&self, owner_id: OwnerId, collection_key: &str) -> Result<u64, StoreError> {
        let key = normalize_collection_key(collection_key);
        let mut alerts = lock(&self.alerts)?;

        let before = alerts.len();
        alerts.retain(|a| !(a.owner_id == owner_id && a.collection_key == key));

        Ok((before - alerts.len()) as u64)
    }
}

#[async_trait]
impl WatchStore for MemoryStore {
    async fn add(&self, owner_id: OwnerId, collection_key: &str) -> Result<bool, StoreError> {
        let watch = TrackedCollection::new(owner_id, collection_key);
        let mut watches = lock(&self.watches)?;

        if watches
            .iter()
            .any(|w| w.owner_id == owner_id && w.collection_key == watch.collection_key)
        {
            return Ok(false);
        }

        watches.push(watch);
        Ok(true)
    }

    async fn remove(&self, owner_id: OwnerId, collection_key: &str) -> Result<bool, StoreError> {
        let key = normalize_collection_key(collection_key);
        let mut watches = lock(&self.watches)?;

        let before = watches.len();
        watches.retain(|w| !(w.owner_id == owner_id && w.collection_key == key));

        Ok(watches.len() < before)
    }

    async fn list_for(&self, owner_id: OwnerId) -> Result<Vec<String>, StoreError> {
        Ok(lock(&self.watches)?
            .iter()
            .filter(|w| w.owner_id == owner_id)
            .map(|w| w.collection_key.clone())
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<(OwnerId, String)>, StoreError> {
        Ok(lock(&self.watches)?
            .iter()
            .map(|w| (w.owner_id, w.collection_key.clone()))
            .collect())
    }
}
