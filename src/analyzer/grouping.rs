use crate::model::{GroupedProduct, Offer};
use std::collections::HashMap;

/// Groups offers by product id. Groups come out in first-seen order and keep
/// their offers in input order; nothing is deduplicated.
pub fn group_offers(offers: Vec<Offer>) -> Vec<GroupedProduct> {
    let mut index: HashMap<i64, usize> = HashMap::new();
    let mut groups: Vec<GroupedProduct> = Vec::new();

    for offer in offers {
        let slot = *index.entry(offer.product.id).or_insert_with(|| {
            groups.push(GroupedProduct {
                product: offer.product.clone(),
                offers: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].offers.push(offer);
    }

    groups
}

/// Feed-supplied profit wins; otherwise `price - retail_price`.
pub fn offer_profit(offer: &Offer, retail_price: Option<i64>) -> Option<i64> {
    offer
        .profit
        .or_else(|| retail_price.map(|retail| offer.price - retail))
}

impl GroupedProduct {
    /// Highest price; the earliest offer wins a tie.
    pub fn best_offer(&self) -> Option<&Offer> {
        self.offers.iter().fold(None, |best: Option<&Offer>, offer| match best {
            Some(current) if current.price >= offer.price => Some(current),
            _ => Some(offer),
        })
    }

    /// Offers by price, highest first. Equal prices keep input order.
    pub fn ranked_offers(&self) -> Vec<&Offer> {
        let mut ranked: Vec<&Offer> = self.offers.iter().collect();
        ranked.sort_by(|a, b| b.price.cmp(&a.price));
        ranked
    }

    pub fn best_profit(&self) -> Option<i64> {
        self.best_offer()
            .and_then(|offer| offer_profit(offer, self.product.retail_price))
    }
}
