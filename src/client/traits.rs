use crate::model::{ApiError, KlinePoint, MarketStats, Offer, PriceHistory};

/// Source of the raw board data. The HTTP client is the production
/// implementation; tests substitute canned data.
#[async_trait::async_trait]
pub trait PriceSource: Send + Sync {
    /// Latest offer per product and store, highest price first.
    async fn fetch_prices(&self, limit: u32) -> Result<Vec<Offer>, ApiError>;

    async fn fetch_stats(&self) -> Result<MarketStats, ApiError>;

    /// Daily OHLC points for one product over the last `days` days.
    async fn fetch_kline(&self, product_id: i64, days: u32) -> Result<Vec<KlinePoint>, ApiError>;

    /// Most recent offer from every store carrying the product, unordered.
    async fn fetch_latest(&self, product_id: i64) -> Result<Vec<Offer>, ApiError>;

    async fn fetch_history(
        &self,
        product_id: i64,
        store_id: i64,
        days: u32,
    ) -> Result<PriceHistory, ApiError>;
}
