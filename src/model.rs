// Core structs: Store, Product, Offer, GroupedProduct, MarketStats, KlinePoint, PriceHistory
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::{null_as_empty, parse_datetime};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub model: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub capacity: String,
    #[serde(default)]
    pub retail_price: Option<i64>,
}

/// One store's buyback quote for one product, as served by `/api/v1/prices`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    pub id: i64,
    pub price: i64,
    #[serde(default)]
    pub price_change: i64,
    #[serde(default)]
    pub price_change_percent: f64,
    pub store: Store,
    pub product: Product,
    /// Profit precomputed by the feed. Takes precedence over a derived one.
    #[serde(default)]
    pub profit: Option<i64>,
}

/// All offers for a single product id, in input order.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedProduct {
    pub product: Product,
    pub offers: Vec<Offer>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MarketStats {
    #[serde(default)]
    pub total_products: u64,
    #[serde(default)]
    pub total_stores: u64,
    #[serde(default)]
    pub today_updates: u64,
    #[serde(default)]
    pub price_changes_24h: u64,
    #[serde(default)]
    pub last_updated: Option<String>,
}

impl MarketStats {
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        self.last_updated.as_deref().and_then(parse_datetime)
    }
}

/// One daily open/high/low/close point of the short price series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KlinePoint {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub best_store: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub price: i64,
    pub recorded_at: String,
}

impl HistoryEntry {
    pub fn recorded_at_time(&self) -> Option<DateTime<Utc>> {
        parse_datetime(&self.recorded_at)
    }
}

/// Recorded prices of one product at one store, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub product: Product,
    pub store: Store,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

impl PriceHistory {
    /// Each recorded price as a flat point, so the series can go through the
    /// same sparkline and summary code as the daily candles.
    pub fn points(&self) -> Vec<KlinePoint> {
        self.history
            .iter()
            .map(|entry| {
                let price = entry.price as f64;
                KlinePoint {
                    date: entry.recorded_at.clone(),
                    open: price,
                    high: price,
                    low: price,
                    close: price,
                    best_store: None,
                }
            })
            .collect()
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API URL \"{url}\": {reason}")]
    InvalidUrl { url: String, reason: String },
}
