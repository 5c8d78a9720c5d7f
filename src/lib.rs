//! Buyback price board: groups per-store iPhone trade-in offers by product,
//! ranks them, and annotates them with profit and foreign-currency figures.

pub mod analyzer;
pub mod board;
pub mod chart;
pub mod client;
pub mod config;
pub mod format;
pub mod fx;
pub mod model;
pub mod normalizer;
pub mod pipeline;
pub mod render;
pub mod utils;

pub use board::{assemble, Board};
pub use client::{ApiClient, PriceSource};
pub use config::{load_config, AppConfig};
pub use fx::{Rate, RateTable};
pub use model::{ApiError, GroupedProduct, Offer, PriceHistory, Product, Store};
pub use pipeline::{build_board, fetch_detail, refresh, ProductDetail, Snapshot};
