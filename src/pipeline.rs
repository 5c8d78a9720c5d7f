//! One refresh cycle: fetch, aggregate, assemble.

use futures::future::join_all;
use tracing::{info, warn};

use crate::analyzer::group_offers;
use crate::board::{assemble, product_row, Board, ProductRow};
use crate::client::PriceSource;
use crate::config::AppConfig;
use crate::fx::RateTable;
use crate::model::{ApiError, KlinePoint, MarketStats, Offer, PriceHistory};
use crate::render::Sparklines;

/// Everything one successful fetch produced. Replaces the previous snapshot
/// wholesale.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub board: Board,
    pub stats: Option<MarketStats>,
    pub sparklines: Sparklines,
}

/// Pure part of the cycle: raw offers to the ordered board.
pub fn build_board(offers: Vec<Offer>, rates: &RateTable) -> Board {
    assemble(group_offers(offers), rates)
}

/// Fetches offers and stats concurrently, assembles the board, then fetches
/// sparkline series for the products that made it onto the board.
///
/// # Errors
///
/// Fails only when the offer list cannot be fetched. Stats and sparkline
/// failures are logged and leave their part of the snapshot empty.
pub async fn refresh(source: &dyn PriceSource, config: &AppConfig) -> Result<Snapshot, ApiError> {
    let (offers, stats) = tokio::join!(
        source.fetch_prices(config.price_limit),
        source.fetch_stats()
    );
    let offers = offers?;
    info!("Fetched {} offers", offers.len());

    let stats = match stats {
        Ok(stats) => Some(stats),
        Err(e) => {
            warn!("Stats fetch failed: {e}");
            None
        }
    };

    let mut board = build_board(offers, &config.rates);
    if let Some(query) = config.search.as_deref() {
        board = board.filter(query);
    }
    info!(
        "Board: {} sections, {} rows ({} invalid capacity, {} unclassified)",
        board.sections.len(),
        board.row_count(),
        board.invalid_capacity,
        board.unclassified
    );

    let mut sparklines = Sparklines::new();
    if config.show_sparklines {
        let ids = board.product_ids();
        let tasks = ids
            .iter()
            .map(|id| source.fetch_kline(*id, config.kline_days));
        for (id, result) in ids.iter().zip(join_all(tasks).await) {
            match result {
                Ok(points) if !points.is_empty() => {
                    sparklines.insert(*id, points);
                }
                Ok(_) => {}
                Err(e) => warn!("Sparkline fetch failed for product {id}: {e}"),
            }
        }
    }

    Ok(Snapshot {
        board,
        stats,
        sparklines,
    })
}

/// One product's store breakdown with its price history.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub product_id: i64,
    /// `None` when no store currently quotes the product.
    pub row: Option<ProductRow>,
    /// One series per store that answered, in the row's offer order.
    pub histories: Vec<PriceHistory>,
    pub kline: Vec<KlinePoint>,
}

/// Fetches the latest offer of every store for one product, then the price
/// history of each of those stores.
///
/// # Errors
///
/// Fails only when the latest offers cannot be fetched. History and candle
/// failures are logged and leave their part empty.
pub async fn fetch_detail(
    source: &dyn PriceSource,
    product_id: i64,
    config: &AppConfig,
) -> Result<ProductDetail, ApiError> {
    let (latest, kline) = tokio::join!(
        source.fetch_latest(product_id),
        source.fetch_kline(product_id, config.kline_days)
    );
    let latest = latest?;
    info!("Fetched {} latest offers for product {product_id}", latest.len());

    let kline = kline.unwrap_or_else(|e| {
        warn!("Kline fetch failed for product {product_id}: {e}");
        Vec::new()
    });

    let row = group_offers(latest)
        .iter()
        .find(|group| group.product.id == product_id)
        .and_then(|group| product_row(group, &config.rates));

    let mut histories = Vec::new();
    if let Some(row) = &row {
        let tasks = row
            .offers
            .iter()
            .map(|line| source.fetch_history(product_id, line.store_id, config.history_days));
        for (line, result) in row.offers.iter().zip(join_all(tasks).await) {
            match result {
                Ok(history) => histories.push(history),
                Err(e) => warn!("History fetch failed for store {}: {e}", line.store),
            }
        }
    }

    Ok(ProductDetail {
        product_id,
        row,
        histories,
        kline,
    })
}
