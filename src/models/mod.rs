use std::sync::LazyLock;

use regex::Regex;

pub mod alert;
pub mod snapshot;
pub mod watch;

pub use alert::{AlertDirection, AlertNotification, PriceAlert};
pub use snapshot::{CollectionInfo, CollectionSnapshot};
pub use watch::TrackedCollection;

/// Chat/user identifier as handed to us by the transport.
pub type OwnerId = i64;

/// Collection keys are compared case-insensitively, so they are stored
/// lowercased.
pub fn normalize_collection_key(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Marketplace slugs are `[a-z0-9_-]`. Anything else never reaches an
/// upstream URL.
pub fn is_valid_collection_key(key: &str) -> bool {
    static SLUG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-z0-9_-]+$").unwrap());
    SLUG.is_match(key)
}

/// Normalizes user input and rejects anything that isn't a plain slug.
pub fn parse_collection_key(raw: &str) -> Option<String> {
    let key = normalize_collection_key(raw);
    is_valid_collection_key(&key).then_some(key)
}
