use std::cmp::Ordering;

use crate::opportunity::{CrossExchangeOpportunity, TriangularOpportunity};

/// Ordering rules for one kind of opportunity.
pub trait Ranked {
    fn profit_percent(&self) -> f64;

    /// Decides between two records with equal profit.
    fn tie_break(&self, other: &Self) -> Ordering;
}

impl Ranked for TriangularOpportunity {
    fn profit_percent(&self) -> f64 {
        self.profit_percent
    }

    fn tie_break(&self, other: &Self) -> Ordering {
        self.path.cmp(&other.path)
    }
}

impl Ranked for CrossExchangeOpportunity {
    fn profit_percent(&self) -> f64 {
        self.profit_percent
    }

    fn tie_break(&self, other: &Self) -> Ordering {
        self.asset
            .cmp(&other.asset)
            .then_with(|| self.buy_exchange.cmp(&other.buy_exchange))
            .then_with(|| self.sell_exchange.cmp(&other.sell_exchange))
    }
}

/// Keeps candidates with `profit_percent >= min_profit_percent` and sorts them
/// by descending profit.
///
/// The sort is stable and fully ordered, so identical inputs always rank
/// identically. NaN profits never pass the threshold.
pub fn rank<T: Ranked>(candidates: Vec<T>, min_profit_percent: f64) -> Vec<T> {
    let mut ranked: Vec<T> = candidates
        .into_iter()
        .filter(|candidate| candidate.profit_percent() >= min_profit_percent)
        .collect();

    ranked.sort_by(|a, b| {
        b.profit_percent()
            .total_cmp(&a.profit_percent())
            .then_with(|| a.tie_break(b))
    });
    ranked
}
