use async_trait::async_trait;

use crate::{
    error::FetchError,
    models::{CollectionInfo, CollectionSnapshot},
};

/// "Fetch the current floor for collection X". No retries happen in here;
/// retry policy belongs to the caller.
#[async_trait]
pub trait PriceSource: Send + Sync {
    async fn fetch(&self, collection_key: &str) -> Result<CollectionSnapshot, FetchError>;

    async fn fetch_info(&self, collection_key: &str) -> Result<CollectionInfo, FetchError>;

    /// Stats and metadata gathered concurrently. Each half fails on its own.
    async fn fetch_detailed(
        &self,
        collection_key: &str,
    ) -> (
        Result<CollectionSnapshot, FetchError>,
        Result<CollectionInfo, FetchError>,
    ) {
        tokio::join!(self.fetch(collection_key), self.fetch_info(collection_key))
    }
}
