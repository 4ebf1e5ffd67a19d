#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
};

use async_trait::async_trait;
use floorwatch::{
    error::{DeliveryError, FetchError},
    models::{CollectionInfo, CollectionSnapshot, OwnerId},
    services::{memory_store::MemoryStore, notifier::Notifier, price_source::PriceSource},
    AppState,
};

/// Scripted floors per collection, with a call counter.
#[derive(Default)]
pub struct FakePriceSource {
    floors: Mutex<HashMap<String, Result<Option<f64>, FetchError>>>,
    names: Mutex<HashMap<String, String>>,
    calls: Mutex<HashMap<String, usize>>,
}

impl FakePriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_floor(&self, key: &str, price: f64) {
        self.floors.lock().unwrap().insert(key.to_string(), Ok(Some(price)));
    }

    pub fn set_no_floor(&self, key: &str) {
        self.floors.lock().unwrap().insert(key.to_string(), Ok(None));
    }

    pub fn set_error(&self, key: &str, err: FetchError) {
        self.floors.lock().unwrap().insert(key.to_string(), Err(err));
    }

    pub fn set_name(&self, key: &str, name: &str) {
        self.names.lock().unwrap().insert(key.to_string(), name.to_string());
    }

    pub fn calls(&self, key: &str) -> usize {
        self.calls.lock().unwrap().get(key).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }
}

#[async_trait]
impl PriceSource for FakePriceSource {
    async fn fetch(&self, collection_key: &str) -> Result<CollectionSnapshot, FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(collection_key.to_string())
            .or_default() += 1;

        let scripted = self
            .floors
            .lock()
            .unwrap()
            .get(collection_key)
            .cloned()
            .unwrap_or(Err(FetchError::NotFound));

        scripted.map(|floor_price| CollectionSnapshot {
            collection_key: collection_key.to_string(),
            floor_price,
            currency_symbol: "ETH".to_string(),
            num_owners: Some(1000),
            total_volume: Some(250.0),
            fetched_at: 0,
        })
    }

    async fn fetch_info(&self, collection_key: &str) -> Result<CollectionInfo, FetchError> {
        match self.names.lock().unwrap().get(collection_key) {
            Some(name) => Ok(CollectionInfo {
                collection_key: collection_key.to_string(),
                name: Some(name.clone()),
                total_supply: Some(10_000),
            }),
            None => Err(FetchError::NotFound),
        }
    }
}

/// Records every message; can be told to fail.
#[derive(Default)]
pub struct FakeNotifier {
    sent: Mutex<Vec<(OwnerId, String)>>,
    failing: AtomicBool,
    attempts: Mutex<usize>,
}

impl FakeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<(OwnerId, String)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl Notifier for FakeNotifier {
    async fn send(&self, recipient: OwnerId, message: &str) -> Result<(), DeliveryError> {
        *self.attempts.lock().unwrap() += 1;

        if self.failing.load(Ordering::SeqCst) {
            return Err(DeliveryError::Transport("chat unreachable".to_string()));
        }

        self.sent.lock().unwrap().push((recipient, message.to_string()));
        Ok(())
    }
}

pub fn test_state(store: &Arc<MemoryStore>, prices: &Arc<FakePriceSource>) -> AppState {
    AppState {
        alerts: store.clone(),
        watches: store.clone(),
        prices: prices.clone(),
    }
}
