use std::{fmt, str::FromStr};

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::OwnerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    #[default]
    Below,
    Above,
}

impl AlertDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            AlertDirection::Below => "below",
            AlertDirection::Above => "above",
        }
    }

    /// Strict comparison: a price equal to the threshold never fires.
    pub fn is_crossed(self, price: f64, threshold: f64) -> bool {
        match self {
            AlertDirection::Below => price < threshold,
            AlertDirection::Above => price > threshold,
        }
    }
}

impl fmt::Display for AlertDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "below" => Ok(AlertDirection::Below),
            "above" => Ok(AlertDirection::Above),
            other => Err(format!("unknown alert direction: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceAlert {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub owner_id: OwnerId,
    pub collection_key: String,

    pub threshold: f64,
    pub direction: AlertDirection,

    // flips to false exactly once, when the alert fires
    pub active: bool,

    pub created_at: i64,
    pub triggered_at: Option<i64>,
}

impl PriceAlert {
    pub fn new(owner_id: OwnerId, collection_key: &str, threshold: f64, direction: AlertDirection) -> Self {
        Self {
            id: ObjectId::new(),
            owner_id,
            collection_key: super::normalize_collection_key(collection_key),
            threshold,
            direction,
            active: true,
            created_at: chrono::Utc::now().timestamp(),
            triggered_at: None,
        }
    }
}

/// What gets handed to the notifier when an alert fires.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertNotification {
    pub owner_id: OwnerId,
    pub collection_key: String,
    pub current_price: f64,
    pub currency_symbol: String,
    pub threshold: f64,
    pub direction: AlertDirection,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_never_triggers() {
        assert!(!AlertDirection::Below.is_crossed(10.0, 10.0));
        assert!(!AlertDirection::Above.is_crossed(10.0, 10.0));
    }

    #[test]
    fn strict_crossing() {
        assert!(AlertDirection::Below.is_crossed(9.5, 10.0));
        assert!(!AlertDirection::Below.is_crossed(10.5, 10.0));
        assert!(AlertDirection::Above.is_crossed(10.5, 10.0));
        assert!(!AlertDirection::Above.is_crossed(9.5, 10.0));
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("Above".parse::<AlertDirection>(), Ok(AlertDirection::Above));
        assert_eq!(" below ".parse::<AlertDirection>(), Ok(AlertDirection::Below));
        assert!("sideways".parse::<AlertDirection>().is_err());
    }
}
