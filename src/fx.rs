// Static exchange-rate table and JPY conversion for display
use serde::{Deserialize, Serialize};

use crate::utils::group_thousands;

/// JPY per one unit of a foreign currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rate {
    pub code: String,
    pub rate: f64,
    pub symbol: String,
    #[serde(default)]
    pub flag: String,
}

impl Rate {
    pub fn new(code: &str, rate: f64, symbol: &str, flag: &str) -> Self {
        Self {
            code: code.to_string(),
            rate,
            symbol: symbol.to_string(),
            flag: flag.to_string(),
        }
    }
}

/// Ordered rate table. Injected from configuration; the default is the
/// 2026-02-25 snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable(pub Vec<Rate>);

impl Default for RateTable {
    fn default() -> Self {
        Self(vec![
            Rate::new("USD", 155.76, "$", "🇺🇸"),
            Rate::new("HKD", 19.92, "HK$", "🇭🇰"),
            Rate::new("CNY", 22.62, "¥", "🇨🇳"),
            Rate::new("EUR", 183.49, "€", "🇪🇺"),
        ])
    }
}

impl RateTable {
    pub fn iter(&self) -> impl Iterator<Item = &Rate> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `USD $1,026 / HKD HK$8,022 / ...` for one yen amount.
    pub fn describe(&self, jpy: i64) -> Vec<String> {
        self.iter()
            .map(|rate| format!("{} {}", rate.code, format_fx(jpy, rate)))
            .collect()
    }
}

pub fn convert(jpy: i64, rate: &Rate) -> f64 {
    jpy as f64 / rate.rate
}

/// Whole units with thousands separators from 1000 up, two decimals below.
pub fn format_fx(jpy: i64, rate: &Rate) -> String {
    let amount = convert(jpy, rate);
    let sign = if amount < 0.0 { "-" } else { "" };
    let magnitude = amount.abs();
    // Decide on the value as it would print, so 999.996 is not shown as 1000.00.
    let cents = (magnitude * 100.0).round() / 100.0;

    if cents >= 1000.0 {
        // f64::round rounds half away from zero.
        let whole = magnitude.round() as u64;
        format!("{sign}{}{}", rate.symbol, group_thousands(whole))
    } else {
        format!("{sign}{}{magnitude:.2}", rate.symbol)
    }
}
