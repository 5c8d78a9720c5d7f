use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::Utc;
use reqwest::header::{CACHE_CONTROL, EXPIRES, PRAGMA};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::traits::PriceSource;
use crate::model::{ApiError, KlinePoint, MarketStats, Offer, PriceHistory};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) KaitoriBoard/0.1";

/// HTTP client for the buyback price API.
///
/// Every request carries a fresh `_t` nonce and no-cache headers so that no
/// intermediary cache can serve a stale board.
pub struct ApiClient {
    client: Client,
    base_url: Url,
    last_nonce: AtomicU64,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidUrl`] if `base_url` does not parse, or
    /// [`ApiError::Http`] if the underlying client cannot be built.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, ApiError> {
        let mut base = Url::parse(base_url).map_err(|e| ApiError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl {
                url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }
        // join() replaces the last segment unless the path ends in '/'
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: base,
            last_nonce: AtomicU64::new(0),
        })
    }

    /// Wall-clock milliseconds, bumped when needed so it never repeats.
    fn next_nonce(&self) -> u64 {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let previous = self
            .last_nonce
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                Some(now.max(last + 1))
            })
            .unwrap_or_default();
        now.max(previous + 1)
    }

    fn endpoint(&self, path: &str, query: &[(&str, String)]) -> Result<Url, ApiError> {
        let mut url = self.base_url.join(path).map_err(|e| ApiError::InvalidUrl {
            url: format!("{}{path}", self.base_url),
            reason: e.to_string(),
        })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("_t", &self.next_nonce().to_string());
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path, query)?;
        debug!(%url, "GET");

        let response = self
            .client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-cache, no-store, must-revalidate")
            .header(PRAGMA, "no-cache")
            .header(EXPIRES, "0")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|source| ApiError::Deserialize {
            context: format!("response from {}", url.path()),
            source,
        })
    }
}

#[async_trait::async_trait]
impl PriceSource for ApiClient {
    async fn fetch_prices(&self, limit: u32) -> Result<Vec<Offer>, ApiError> {
        self.get_json("api/v1/prices", &[("limit", limit.to_string())])
            .await
    }

    async fn fetch_stats(&self) -> Result<MarketStats, ApiError> {
        self.get_json("api/v1/stats", &[]).await
    }

    async fn fetch_kline(&self, product_id: i64, days: u32) -> Result<Vec<KlinePoint>, ApiError> {
        self.get_json(
            &format!("prices/kline/{product_id}"),
            &[("days", days.to_string())],
        )
        .await
    }

    async fn fetch_latest(&self, product_id: i64) -> Result<Vec<Offer>, ApiError> {
        self.get_json(&format!("api/v1/prices/latest/{product_id}"), &[])
            .await
    }

    async fn fetch_history(
        &self,
        product_id: i64,
        store_id: i64,
        days: u32,
    ) -> Result<PriceHistory, ApiError> {
        self.get_json(
            &format!("api/v1/history/{product_id}/{store_id}"),
            &[("days", days.to_string())],
        )
        .await
    }
}
