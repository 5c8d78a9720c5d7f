//! End-to-end scenarios: raw offers through grouping, ranking and assembly.

use std::collections::HashMap;
use std::sync::Mutex;

use kaitori_board::config::AppConfig;
use kaitori_board::fx::{format_fx, Rate};
use kaitori_board::model::{HistoryEntry, KlinePoint, MarketStats};
use kaitori_board::normalizer::DeviceLine;
use kaitori_board::{
    build_board, fetch_detail, refresh, ApiError, Offer, PriceHistory, PriceSource, Product,
    RateTable, Store,
};

fn offer(id: i64, product_id: i64, model: &str, capacity: &str, price: i64, store: &str) -> Offer {
    Offer {
        id,
        price,
        price_change: 0,
        price_change_percent: 0.0,
        store: Store {
            id,
            name: store.to_string(),
        },
        product: Product {
            id: product_id,
            name: format!("{model} {capacity}"),
            model: model.to_string(),
            capacity: capacity.to_string(),
            retail_price: Some(159_800),
        },
        profit: None,
    }
}

#[test]
fn best_offer_and_profit_for_a_two_store_product() {
    let offers = vec![
        offer(1, 1, "iPhone 17 Pro", "256GB", 180_000, "A"),
        offer(2, 1, "iPhone 17 Pro", "256GB", 175_000, "B"),
    ];

    let board = build_board(offers, &RateTable::default());

    let section = board.section(DeviceLine::Iphone17Pro).unwrap();
    assert_eq!(section.rows.len(), 1);
    let row = &section.rows[0];
    assert_eq!(row.best.price, 180_000);
    assert_eq!(row.best.store, "A");
    assert_eq!(row.best.profit, Some(20_200));
    assert_eq!(row.offers.len(), 2);
    assert_eq!(row.offers[1].profit, Some(15_200));
}

#[test]
fn blank_capacity_product_never_reaches_the_board() {
    let offers = vec![
        offer(1, 1, "iPhone 17 Pro", "", 999_000, "A"),
        offer(2, 2, "iPhone 17 Pro", "256GB", 180_000, "A"),
    ];

    let board = build_board(offers, &RateTable::default());

    assert!(!board.product_ids().contains(&1));
    assert_eq!(board.product_ids(), vec![2]);
    assert_eq!(board.invalid_capacity, 1);
}

#[test]
fn pro_max_lands_only_in_its_own_section() {
    let offers = vec![
        offer(1, 1, "iPhone 17 Pro Max", "256GB", 200_000, "A"),
        offer(2, 2, "iPhone 17 Pro", "256GB", 180_000, "A"),
    ];

    let board = build_board(offers, &RateTable::default());

    let pro_max = board.section(DeviceLine::Iphone17ProMax).unwrap();
    let pro = board.section(DeviceLine::Iphone17Pro).unwrap();
    assert_eq!(pro_max.rows.iter().map(|r| r.product.id).collect::<Vec<_>>(), vec![1]);
    assert_eq!(pro.rows.iter().map(|r| r.product.id).collect::<Vec<_>>(), vec![2]);
}

#[test]
fn usd_conversion_of_both_branches() {
    let usd = Rate::new("USD", 155.76, "$", "🇺🇸");
    // 194,800 / 155.76 = 1250.64, rounded to the nearest dollar
    assert_eq!(format_fx(194_800, &usd), "$1,251");
    assert_eq!(format_fx(50, &usd), "$0.32");
}

struct FakeSource {
    offers: Vec<Offer>,
    prices_ok: bool,
    stats_ok: bool,
    klines: HashMap<i64, Vec<KlinePoint>>,
    kline_calls: Mutex<Vec<i64>>,
    /// Recorded prices keyed by store id. Stores without an entry answer 404.
    histories: HashMap<i64, Vec<i64>>,
}

impl FakeSource {
    fn new(offers: Vec<Offer>) -> Self {
        Self {
            offers,
            prices_ok: true,
            stats_ok: true,
            klines: HashMap::new(),
            kline_calls: Mutex::new(Vec::new()),
            histories: HashMap::new(),
        }
    }
}

fn server_error(url: &str) -> ApiError {
    ApiError::UnexpectedStatus {
        status: 500,
        url: url.to_string(),
    }
}

#[async_trait::async_trait]
impl PriceSource for FakeSource {
    async fn fetch_prices(&self, limit: u32) -> Result<Vec<Offer>, ApiError> {
        if !self.prices_ok {
            return Err(server_error("/api/v1/prices"));
        }
        Ok(self.offers.iter().take(limit as usize).cloned().collect())
    }

    async fn fetch_stats(&self) -> Result<MarketStats, ApiError> {
        if self.stats_ok {
            Ok(MarketStats {
                total_products: 3,
                ..MarketStats::default()
            })
        } else {
            Err(server_error("/api/v1/stats"))
        }
    }

    async fn fetch_kline(&self, product_id: i64, _days: u32) -> Result<Vec<KlinePoint>, ApiError> {
        self.kline_calls.lock().unwrap().push(product_id);
        Ok(self.klines.get(&product_id).cloned().unwrap_or_default())
    }

    async fn fetch_latest(&self, product_id: i64) -> Result<Vec<Offer>, ApiError> {
        if !self.prices_ok {
            return Err(server_error("/api/v1/prices/latest"));
        }
        Ok(self
            .offers
            .iter()
            .filter(|o| o.product.id == product_id)
            .cloned()
            .collect())
    }

    async fn fetch_history(
        &self,
        product_id: i64,
        store_id: i64,
        _days: u32,
    ) -> Result<PriceHistory, ApiError> {
        let prices = self
            .histories
            .get(&store_id)
            .ok_or_else(|| ApiError::UnexpectedStatus {
                status: 404,
                url: format!("/api/v1/history/{product_id}/{store_id}"),
            })?;
        let offer = self
            .offers
            .iter()
            .find(|o| o.product.id == product_id && o.store.id == store_id)
            .ok_or_else(|| server_error("/api/v1/history"))?;
        Ok(PriceHistory {
            product: offer.product.clone(),
            store: offer.store.clone(),
            history: prices
                .iter()
                .map(|&price| HistoryEntry {
                    price,
                    recorded_at: "2026-02-25T09:00:00".to_string(),
                })
                .collect(),
        })
    }
}

fn config() -> AppConfig {
    AppConfig::from_json(r#"{"api_base_url": "http://localhost:8000"}"#).unwrap()
}

fn kline(close: f64) -> KlinePoint {
    KlinePoint {
        date: "2026-02-25".to_string(),
        open: 170_000.0,
        high: 185_000.0,
        low: 169_000.0,
        close,
        best_store: None,
    }
}

#[tokio::test]
async fn refresh_fetches_sparklines_only_for_displayed_products() {
    let mut source = FakeSource::new(vec![
        offer(1, 1, "iPhone 17 Pro", "256GB", 180_000, "A"),
        offer(2, 2, "iPhone 15", "128GB", 50_000, "A"),
        offer(3, 3, "iPhone 16e", "128GB", 60_000, "B"),
    ]);
    source.klines = HashMap::from([(1, vec![kline(180_000.0)])]);

    let snapshot = refresh(&source, &config()).await.unwrap();

    assert_eq!(snapshot.board.product_ids(), vec![1, 3]);
    assert_eq!(snapshot.stats.map(|s| s.total_products), Some(3));
    assert_eq!(*source.kline_calls.lock().unwrap(), vec![1, 3]);
    assert!(snapshot.sparklines.contains_key(&1));
    assert!(!snapshot.sparklines.contains_key(&3), "empty series are skipped");
}

#[tokio::test]
async fn stats_failure_does_not_fail_the_refresh() {
    let mut source = FakeSource::new(vec![offer(1, 1, "iPhone 16", "128", 70_000, "A")]);
    source.stats_ok = false;
    let mut cfg = config();
    cfg.show_sparklines = false;

    let snapshot = refresh(&source, &cfg).await.unwrap();

    assert!(snapshot.stats.is_none());
    assert_eq!(snapshot.board.row_count(), 1);
    assert!(source.kline_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn price_failure_fails_the_refresh_without_fetching_sparklines() {
    let mut source = FakeSource::new(vec![offer(1, 1, "iPhone 17 Pro", "256GB", 180_000, "A")]);
    source.prices_ok = false;

    let result = refresh(&source, &config()).await;

    assert!(
        matches!(result, Err(ApiError::UnexpectedStatus { status: 500, .. })),
        "expected the price error, got: {result:?}"
    );
    assert!(source.kline_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn search_filter_is_applied_to_the_snapshot() {
    let source = FakeSource::new(vec![
        offer(1, 1, "iPhone 17 Pro", "256GB", 180_000, "A"),
        offer(2, 2, "iPhone 17 Pro", "1TB", 250_000, "A"),
    ]);
    let mut cfg = config();
    cfg.search = Some("1tb".to_string());

    let snapshot = refresh(&source, &cfg).await.unwrap();

    assert_eq!(snapshot.board.product_ids(), vec![2]);
}

#[tokio::test]
async fn detail_ranks_stores_and_keeps_histories_that_answered() {
    let mut source = FakeSource::new(vec![
        offer(1, 7, "iPhone 17 Pro", "256GB", 175_000, "A"),
        offer(2, 7, "iPhone 17 Pro", "256GB", 181_000, "B"),
        offer(3, 8, "iPhone 17 Pro", "512GB", 210_000, "A"),
    ]);
    source.histories = HashMap::from([(2, vec![178_000, 181_000])]);
    source.klines = HashMap::from([(7, vec![kline(181_000.0)])]);

    let detail = fetch_detail(&source, 7, &config()).await.unwrap();

    let row = detail.row.unwrap();
    assert_eq!(row.best.store, "B");
    assert_eq!(row.offers.iter().map(|o| o.store.as_str()).collect::<Vec<_>>(), vec!["B", "A"]);
    // store 1 has no history and is skipped
    assert_eq!(detail.histories.len(), 1);
    assert_eq!(detail.histories[0].store.name, "B");
    assert_eq!(detail.kline.len(), 1);
}

#[tokio::test]
async fn detail_of_an_unquoted_product_has_no_row() {
    let source = FakeSource::new(vec![offer(1, 7, "iPhone 17 Pro", "256GB", 175_000, "A")]);

    let detail = fetch_detail(&source, 99, &config()).await.unwrap();

    assert!(detail.row.is_none());
    assert!(detail.histories.is_empty());
}

#[tokio::test]
async fn detail_fails_when_latest_offers_fail() {
    let mut source = FakeSource::new(Vec::new());
    source.prices_ok = false;

    assert!(fetch_detail(&source, 7, &config()).await.is_err());
}
