// Plain-text rendering of the board for the terminal
use std::collections::HashMap;
use std::fmt::Write as _;

use crate::analyzer::MarketAnalyzer;
use crate::board::{Board, ProductRow};
use crate::chart::text_sparkline;
use crate::format::{format_man_yen, format_price};
use crate::fx::RateTable;
use crate::model::{KlinePoint, MarketStats, PriceHistory};
use crate::pipeline::ProductDetail;
use crate::utils::group_thousands;

/// What the fetch collaborator currently has to show.
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Loading,
    Empty,
    Populated(Board),
}

impl View {
    pub fn from_board(board: Board) -> Self {
        if board.is_empty() {
            View::Empty
        } else {
            View::Populated(board)
        }
    }
}

pub type Sparklines = HashMap<i64, Vec<KlinePoint>>;

const EMPTY_TEXT: &str = "データがありません\n";

/// How yen amounts on the board are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PriceStyle {
    #[default]
    Full,
    /// Ten-thousand-yen units, `18万`.
    Compact,
}

impl PriceStyle {
    pub fn from_compact(compact: bool) -> Self {
        if compact {
            PriceStyle::Compact
        } else {
            PriceStyle::Full
        }
    }

    fn label(self, price: i64) -> String {
        match self {
            PriceStyle::Full => format_price(price),
            PriceStyle::Compact => format_man_yen(price),
        }
    }
}

pub fn render_view(view: &View, sparklines: &Sparklines, style: PriceStyle) -> String {
    match view {
        View::Loading => "読み込み中...\n".to_string(),
        View::Empty => EMPTY_TEXT.to_string(),
        View::Populated(board) => render_board(board, sparklines, style),
    }
}

/// Empty when no rates are configured.
pub fn render_rates(rates: &RateTable) -> String {
    if rates.is_empty() {
        return String::new();
    }
    let parts: Vec<String> = rates
        .iter()
        .map(|rate| {
            let flag = if rate.flag.is_empty() {
                String::new()
            } else {
                format!("{} ", rate.flag)
            };
            format!("{flag}1{} = {:.2}", rate.code, rate.rate)
        })
        .collect();
    format!("為替レート: {}\n", parts.join(" | "))
}

pub fn render_stats(stats: &MarketStats) -> String {
    let mut out = format!(
        "掲載商品 {}機種 | 比較店舗 {}店舗 | 本日更新 {}件 | 24時間変動 {}件",
        group_thousands(stats.total_products),
        group_thousands(stats.total_stores),
        group_thousands(stats.today_updates),
        group_thousands(stats.price_changes_24h),
    );
    if let Some(updated) = stats.last_updated_at() {
        let _ = write!(out, " | 最終更新 {}", updated.format("%Y-%m-%d %H:%M UTC"));
    }
    out.push('\n');
    out
}

pub fn render_board(board: &Board, sparklines: &Sparklines, style: PriceStyle) -> String {
    let mut out = String::new();
    for section in &board.sections {
        let _ = writeln!(out, "== {} ==", section.title);
        for row in &section.rows {
            render_row(&mut out, row, sparklines.get(&row.product.id), style);
        }
        out.push('\n');
    }
    out
}

fn render_row(
    out: &mut String,
    row: &ProductRow,
    series: Option<&Vec<KlinePoint>>,
    style: PriceStyle,
) {
    let profit = row
        .best
        .profit
        .map(|_| format!("  利益 {}", row.best.profit_label))
        .unwrap_or_default();
    let spark = series
        .map(|points| text_sparkline(points))
        .filter(|s| !s.is_empty())
        .map(|s| format!("  {s}"))
        .unwrap_or_default();

    let _ = writeln!(
        out,
        "  {:<8} {:>10}{profit}  {}{spark}",
        row.capacity_label,
        style.label(row.best.price),
        row.best.store
    );

    if let Some(summary) = series.and_then(|points| MarketAnalyzer::summarize(points)) {
        let _ = writeln!(
            out,
            "           高 {} / 低 {}",
            style.label(summary.high.round() as i64),
            style.label(summary.low.round() as i64)
        );
    }

    if let Some(retail) = &row.retail_label {
        let _ = writeln!(out, "           定価 {retail}");
        if !row.retail_fx.is_empty() {
            let _ = writeln!(out, "           {}", row.retail_fx.join(" / "));
        }
    }
}

/// Every store's offer for one row, highest first.
pub fn render_detail(row: &ProductRow) -> String {
    let mut out = format!("{} {}\n", row.product.model, row.capacity_label);
    let retail = row.retail_label.as_deref().unwrap_or("-");
    for line in &row.offers {
        let _ = writeln!(
            out,
            "  {:<16} {:>10}  定価 {retail}  利益 {}  変動 {}",
            line.store, line.price_label, line.profit_label, line.change_label
        );
    }
    out
}

/// Detail mode: the store breakdown followed by one history line per store.
pub fn render_product_detail(detail: &ProductDetail) -> String {
    let Some(row) = &detail.row else {
        return EMPTY_TEXT.to_string();
    };
    let mut out = render_detail(row);
    out.push_str("価格推移\n");
    if detail.histories.is_empty() {
        out.push_str("  履歴データがありません\n");
    }
    for history in &detail.histories {
        out.push_str(&render_history_line(history));
    }
    out
}

/// `  A   ▁▃█  高 ¥182,000 / 低 ¥175,000  (3件, 02/25まで)`
pub fn render_history_line(history: &PriceHistory) -> String {
    let points = history.points();
    let Some(summary) = MarketAnalyzer::summarize(&points) else {
        return format!("  {:<16} 履歴データがありません\n", history.store.name);
    };
    let until = history
        .history
        .last()
        .and_then(|entry| entry.recorded_at_time())
        .map(|at| format!(", {}まで", at.format("%m/%d")))
        .unwrap_or_default();
    format!(
        "  {:<16} {}  高 {} / 低 {}  ({}件{until})\n",
        history.store.name,
        text_sparkline(&points),
        format_price(summary.high.round() as i64),
        format_price(summary.low.round() as i64),
        points.len()
    )
}
