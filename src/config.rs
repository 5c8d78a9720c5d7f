use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::fx::RateTable;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    #[serde(default = "default_price_limit")]
    pub price_limit: u32,
    #[serde(default = "default_kline_days")]
    pub kline_days: u32,
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_seconds: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_true")]
    pub show_sparklines: bool,
    /// Optional search filter applied to the assembled board.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub rates: RateTable,
    /// Show prices as `18万` instead of `¥180,000` on the board.
    #[serde(default)]
    pub compact_prices: bool,
    /// When set, the binary shows this one product's store breakdown and
    /// price history instead of the board.
    #[serde(default)]
    pub detail_product_id: Option<i64>,
    #[serde(default = "default_history_days")]
    pub history_days: u32,
    /// Directory that receives `product-<id>.svg` candle charts in detail mode.
    #[serde(default)]
    pub svg_dir: Option<PathBuf>,
}

fn default_price_limit() -> u32 {
    1000
}

fn default_kline_days() -> u32 {
    7
}

fn default_history_days() -> u32 {
    30
}

fn default_refresh_interval() -> u64 {
    60
}

fn default_request_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("api_base_url is empty".into()));
        }
        if self.price_limit == 0 {
            return Err(ConfigError::Invalid("price_limit must be positive".into()));
        }
        if self.kline_days == 0 {
            return Err(ConfigError::Invalid("kline_days must be positive".into()));
        }
        if !(1..=365).contains(&self.history_days) {
            return Err(ConfigError::Invalid(
                "history_days must be between 1 and 365".into(),
            ));
        }
        if self.refresh_interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "refresh_interval_seconds must be positive".into(),
            ));
        }
        if let Some(rate) = self
            .rates
            .iter()
            .find(|r| !r.rate.is_finite() || r.rate <= 0.0)
        {
            return Err(ConfigError::Invalid(format!(
                "rate for {} must be a positive number, got {}",
                rate.code, rate.rate
            )));
        }
        Ok(())
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    AppConfig::from_json(&content)
}
