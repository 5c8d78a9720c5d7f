//! Mini candlestick geometry for the per-product price sparkline.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::analyzer::MarketAnalyzer;
use crate::model::KlinePoint;

const RISING_COLOR: &str = "#22c55e";
const FALLING_COLOR: &str = "#ef4444";
const GRID_COLOR: &str = "#e2e8f0";
const CANDLE_GAP: f64 = 1.0;
pub const CHART_WIDTH: f64 = 70.0;
pub const CHART_HEIGHT: f64 = 28.0;
const SPARK_LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub x: f64,
    pub width: f64,
    pub wick_top: f64,
    pub wick_bottom: f64,
    pub body_top: f64,
    pub body_height: f64,
    pub rising: bool,
}

impl Candle {
    pub fn center_x(&self) -> f64 {
        self.x + self.width / 2.0
    }
}

/// Lays out one candle per point inside a `width` x `height` box.
pub fn layout(points: &[KlinePoint], width: f64, height: f64) -> Vec<Candle> {
    let Some((min_price, max_price)) = MarketAnalyzer::price_bounds(points) else {
        return Vec::new();
    };
    let spread = max_price - min_price;
    let range = if spread == 0.0 { 1.0 } else { spread };
    let candle_width = ((width - 4.0) / points.len() as f64).max(2.0);
    let price_to_y = |price: f64| height - 2.0 - ((price - min_price) / range) * (height - 4.0);

    points
        .iter()
        .enumerate()
        .map(|(index, point)| {
            let y_open = price_to_y(point.open);
            let y_close = price_to_y(point.close);
            Candle {
                x: index as f64 * (candle_width + CANDLE_GAP) + 2.0,
                width: candle_width,
                wick_top: price_to_y(point.high),
                wick_bottom: price_to_y(point.low),
                body_top: y_open.min(y_close),
                body_height: (y_close - y_open).abs().max(1.0),
                rising: point.close >= point.open,
            }
        })
        .collect()
}

/// Standalone `<svg>` document for the sparkline.
pub fn render_svg(points: &[KlinePoint], width: f64, height: f64) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}">"#
    );
    let mid = height / 2.0;
    let _ = write!(
        svg,
        r#"<line x1="0" y1="{mid}" x2="{width}" y2="{mid}" stroke="{GRID_COLOR}" stroke-width="0.5"/>"#
    );

    for candle in layout(points, width, height) {
        let color = if candle.rising { RISING_COLOR } else { FALLING_COLOR };
        let cx = candle.center_x();
        let _ = write!(
            svg,
            r#"<g><line x1="{cx:.2}" y1="{:.2}" x2="{cx:.2}" y2="{:.2}" stroke="{color}" stroke-width="1"/><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{color}" rx="0.5"/></g>"#,
            candle.wick_top,
            candle.wick_bottom,
            candle.x,
            candle.body_top,
            candle.width,
            candle.body_height,
        );
    }

    svg.push_str("</svg>");
    svg
}

/// Writes `product-<id>.svg` into `dir`, creating it if needed.
pub fn write_svg(dir: &Path, product_id: i64, points: &[KlinePoint]) -> io::Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!("product-{product_id}.svg"));
    fs::write(&path, render_svg(points, CHART_WIDTH, CHART_HEIGHT))?;
    Ok(path)
}

/// One block character per close, scaled to the series' price range.
pub fn text_sparkline(points: &[KlinePoint]) -> String {
    let Some((min_price, max_price)) = MarketAnalyzer::price_bounds(points) else {
        return String::new();
    };
    let range = max_price - min_price;
    let top = (SPARK_LEVELS.len() - 1) as f64;

    points
        .iter()
        .map(|point| {
            if range == 0.0 {
                return SPARK_LEVELS[SPARK_LEVELS.len() / 2];
            }
            let level = ((point.close - min_price) / range * top).round() as usize;
            SPARK_LEVELS[level.min(SPARK_LEVELS.len() - 1)]
        })
        .collect()
}
