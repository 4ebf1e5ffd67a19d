use serde::Serialize;

/// One pass-local reading of a collection's floor. Never cached across passes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSnapshot {
    pub collection_key: String,

    // None when the marketplace reports no floor (e.g. nothing listed)
    pub floor_price: Option<f64>,
    pub currency_symbol: String,

    pub num_owners: Option<u64>,
    pub total_volume: Option<f64>,

    pub fetched_at: i64,
}

/// Descriptive metadata, only needed for on-demand lookups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionInfo {
    pub collection_key: String,
    pub name: Option<String>,
    pub total_supply: Option<u64>,
}
