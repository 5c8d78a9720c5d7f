//! Assembles grouped offers into the per-device-line board.
//!
//! The board is rebuilt from scratch for every fetch: sections follow
//! [`DeviceLine::ALL`], rows inside a section follow capacity rank, and each
//! row carries every offer for its product ranked by price.

use serde::Serialize;
use tracing::debug;

use crate::analyzer::offer_profit;
use crate::format::{format_change, format_price, format_signed_price};
use crate::fx::RateTable;
use crate::model::{GroupedProduct, Offer, Product};
use crate::normalizer::{capacity_rank, format_capacity, is_valid_capacity, DeviceLine};

/// One store's offer, with display strings resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OfferLine {
    pub offer_id: i64,
    pub store_id: i64,
    pub store: String,
    pub price: i64,
    pub price_label: String,
    pub profit: Option<i64>,
    /// `-` when the profit is unknown.
    pub profit_label: String,
    pub change_label: String,
}

impl OfferLine {
    fn new(offer: &Offer, retail_price: Option<i64>) -> Self {
        let profit = offer_profit(offer, retail_price);
        Self {
            offer_id: offer.id,
            store_id: offer.store.id,
            store: offer.store.name.clone(),
            price: offer.price,
            price_label: format_price(offer.price),
            profit,
            profit_label: profit.map_or_else(|| "-".to_string(), format_signed_price),
            change_label: format_change(offer.price_change, offer.price_change_percent),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRow {
    pub product: Product,
    pub capacity_label: String,
    pub retail_label: Option<String>,
    /// Retail price in each configured currency, e.g. `USD $1,026`.
    pub retail_fx: Vec<String>,
    pub best: OfferLine,
    /// All offers, highest price first.
    pub offers: Vec<OfferLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub line: DeviceLine,
    pub title: &'static str,
    pub rows: Vec<ProductRow>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Board {
    pub sections: Vec<Section>,
    /// Products dropped for a blank or placeholder capacity.
    pub invalid_capacity: usize,
    /// Products whose model matched no device line.
    pub unclassified: usize,
}

pub fn assemble(groups: Vec<GroupedProduct>, rates: &RateTable) -> Board {
    let mut board = Board::default();
    let mut buckets: Vec<(DeviceLine, Vec<GroupedProduct>)> =
        DeviceLine::ALL.iter().map(|line| (*line, Vec::new())).collect();

    for group in groups {
        if !is_valid_capacity(&group.product.capacity) {
            debug!(
                product_id = group.product.id,
                capacity = %group.product.capacity,
                "dropping product with placeholder capacity"
            );
            board.invalid_capacity += 1;
            continue;
        }
        let Some(line) = DeviceLine::classify(&group.product.model) else {
            debug!(
                product_id = group.product.id,
                model = %group.product.model,
                "dropping unclassified model"
            );
            board.unclassified += 1;
            continue;
        };
        if let Some((_, bucket)) = buckets.iter_mut().find(|(l, _)| *l == line) {
            bucket.push(group);
        }
    }

    for (line, mut bucket) in buckets {
        bucket.sort_by_key(|g| capacity_rank(&g.product.capacity));
        let rows: Vec<ProductRow> = bucket
            .iter()
            .filter_map(|group| product_row(group, rates))
            .collect();
        if rows.is_empty() {
            continue;
        }
        board.sections.push(Section {
            line,
            title: line.label(),
            rows,
        });
    }

    board
}

/// One product's row regardless of its device line. `None` without offers.
pub fn product_row(group: &GroupedProduct, rates: &RateTable) -> Option<ProductRow> {
    let retail_price = group.product.retail_price;
    let best = OfferLine::new(group.best_offer()?, retail_price);
    let offers = group
        .ranked_offers()
        .into_iter()
        .map(|offer| OfferLine::new(offer, retail_price))
        .collect();

    Some(ProductRow {
        capacity_label: format_capacity(&group.product.capacity),
        retail_label: retail_price.map(format_price),
        retail_fx: retail_price.map(|r| rates.describe(r)).unwrap_or_default(),
        product: group.product.clone(),
        best,
        offers,
    })
}

impl Board {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.sections.iter().map(|s| s.rows.len()).sum()
    }

    pub fn section(&self, line: DeviceLine) -> Option<&Section> {
        self.sections.iter().find(|s| s.line == line)
    }

    pub fn product_ids(&self) -> Vec<i64> {
        self.sections
            .iter()
            .flat_map(|s| s.rows.iter().map(|r| r.product.id))
            .collect()
    }

    /// Keeps rows whose product name, model or capacity label contains
    /// `query`, ignoring case. A blank query keeps everything.
    pub fn filter(&self, query: &str) -> Board {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.clone();
        }

        let sections = self
            .sections
            .iter()
            .filter_map(|section| {
                let rows: Vec<ProductRow> = section
                    .rows
                    .iter()
                    .filter(|row| row.matches(&needle))
                    .cloned()
                    .collect();
                (!rows.is_empty()).then(|| Section {
                    line: section.line,
                    title: section.title,
                    rows,
                })
            })
            .collect();

        Board {
            sections,
            invalid_capacity: self.invalid_capacity,
            unclassified: self.unclassified,
        }
    }
}

impl ProductRow {
    fn matches(&self, needle: &str) -> bool {
        [
            self.product.name.as_str(),
            self.product.model.as_str(),
            self.capacity_label.as_str(),
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
    }
}
