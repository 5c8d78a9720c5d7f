// Analyzer module: offer grouping/ranking and price-series indicators.

pub mod grouping;
pub mod market_indicators;

// Re-export the grouping entry points for ease of use.
pub use grouping::{group_offers, offer_profit};
pub use market_indicators::{MarketAnalyzer, PeriodSummary};
