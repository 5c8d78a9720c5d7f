use crate::model::KlinePoint;

/// Period summary of a short OHLC series.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodSummary {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Close of the last point minus open of the first.
    pub change: f64,
    /// Store quoting the best price on the last day, if reported.
    pub best_store: Option<String>,
}

pub struct MarketAnalyzer;

impl MarketAnalyzer {
    pub fn summarize(points: &[KlinePoint]) -> Option<PeriodSummary> {
        let first = points.first()?;
        let last = points.last()?;
        let (low, high) = Self::price_bounds(points)?;

        Some(PeriodSummary {
            open: first.open,
            high,
            low,
            close: last.close,
            change: last.close - first.open,
            best_store: last.best_store.clone(),
        })
    }

    /// Lowest and highest of every open/high/low/close value.
    pub fn price_bounds(points: &[KlinePoint]) -> Option<(f64, f64)> {
        if points.is_empty() {
            return None;
        }
        let (low, high) = points
            .iter()
            .flat_map(|p| [p.open, p.high, p.low, p.close])
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        Some((low, high))
    }
}
