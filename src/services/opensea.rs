use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    error::FetchError,
    models::{is_valid_collection_key, CollectionInfo, CollectionSnapshot},
};

use super::price_source::PriceSource;

const DEFAULT_SYMBOL: &str = "ETH";

#[derive(Clone)]
pub struct OpenSeaClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenSeaClient {
    pub fn new(
        base_url: String,
        api_key: String,
        connect_timeout: Duration,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let http = Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::ConnectionError(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    fn has_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// `collection_key` becomes a path segment, so it must be a plain slug.
    async fn get_json<T>(&self, collection_key: &str, suffix: &str) -> Result<T, FetchError>
    where
        T: for<'de> Deserialize<'de>,
    {
        if !is_valid_collection_key(collection_key) {
            return Err(FetchError::NotFound);
        }

        let url = format!("{}/collections/{}{}", self.base_url, collection_key, suffix);

        let mut req = self.http.get(&url).header("Accept", "application/json");
        if self.has_key() {
            req = req.header("X-API-KEY", &self.api_key);
        }

        let res = req.send().await.map_err(classify)?;

        match res.status() {
            s if s.is_success() => res.json::<T>().await.map_err(classify),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FetchError::Unauthorized),
            StatusCode::NOT_FOUND => Err(FetchError::NotFound),
            StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited),
            other => Err(FetchError::UpstreamError(other.as_u16())),
        }
    }
}

fn classify(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Timeout
    } else if e.is_decode() {
        FetchError::InvalidResponse(e.to_string())
    } else {
        FetchError::ConnectionError(e.to_string())
    }
}

#[async_trait]
impl PriceSource for OpenSeaClient {
    async fn fetch(&self, collection_key: &str) -> Result<CollectionSnapshot, FetchError> {
        let stats: StatsResponse = self
            .get_json(collection_key, "/stats")
            .await?;

        Ok(stats.into_snapshot(collection_key))
    }

    async fn fetch_info(&self, collection_key: &str) -> Result<CollectionInfo, FetchError> {
        let info: InfoResponse = self
            .get_json(collection_key, "")
            .await?;

        Ok(CollectionInfo {
            collection_key: collection_key.to_string(),
            name: info.name.filter(|n| !n.trim().is_empty()),
            total_supply: info.total_supply,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct StatsResponse {
    #[serde(default)]
    pub total: StatsTotal,
}

#[derive(Debug, Default, Deserialize)]
pub struct StatsTotal {
    pub floor_price: Option<f64>,
    pub floor_price_symbol: Option<String>,
    pub num_owners: Option<u64>,
    pub volume: Option<f64>,
}

impl StatsResponse {
    fn into_snapshot(self, collection_key: &str) -> CollectionSnapshot {
        let t = self.total;

        CollectionSnapshot {
            collection_key: collection_key.to_string(),
            // zero is a real floor; only a missing or non-numeric one is absent
            floor_price: t.floor_price.filter(|p| p.is_finite()),
            currency_symbol: t
                .floor_price_symbol
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SYMBOL.to_string()),
            num_owners: t.num_owners,
            total_volume: t.volume,
            fetched_at: Utc::now().timestamp(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct InfoResponse {
    pub name: Option<String>,
    pub total_supply: Option<u64>,
}
