use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::state::{Asset, ExchangeId};

/// Decimal places used when presenting percentages.
pub const PERCENT_PLACES: i32 = 4;
/// Decimal places used when presenting asset amounts.
pub const AMOUNT_PLACES: i32 = 8;

/// Rounds for presentation only; computations never round.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

/// A 3-hop cycle `A -> B -> C -> A` and its compounded outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangularOpportunity {
    /// `[A, B, C, A]`
    pub path: [Asset; 4],
    /// Fee-adjusted rate of each hop, in path order
    pub hop_rates: [f64; 3],
    pub start_notional: f64,
    pub end_notional: f64,
    pub profit_percent: f64,
}

impl TriangularOpportunity {
    /// Absolute profit in units of the base asset
    pub fn profit_amount(&self) -> f64 {
        self.end_notional - self.start_notional
    }
}

impl Display for TriangularOpportunity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [a, b, c, _] = &self.path;
        write!(
            f,
            "{a} → {b} → {c} → {a}: {:+.pp$}% ({:.ap$} {a} → {:.ap$} {a})",
            round_to(self.profit_percent, PERCENT_PLACES),
            round_to(self.start_notional, AMOUNT_PLACES),
            round_to(self.end_notional, AMOUNT_PLACES),
            pp = PERCENT_PLACES as usize,
            ap = AMOUNT_PLACES as usize,
        )
    }
}

/// Buy an asset where it is cheapest and sell it where it is dearest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossExchangeOpportunity {
    pub asset: Asset,
    pub buy_exchange: ExchangeId,
    pub sell_exchange: ExchangeId,
    pub buy_price: f64,
    pub sell_price: f64,
    /// Spread before transfer costs
    pub raw_profit_percent: f64,
    /// Transfer cost as a percentage of the traded notional
    pub transfer_cost_percent: f64,
    /// `raw_profit_percent - transfer_cost_percent`
    pub profit_percent: f64,
}

impl Display for CrossExchangeOpportunity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: buy on {} at {:.ap$}, sell on {} at {:.ap$}: {:+.pp$}% \
             (spread {:.pp$}%, transfer {:.pp$}%)",
            self.asset,
            self.buy_exchange,
            round_to(self.buy_price, AMOUNT_PLACES),
            self.sell_exchange,
            round_to(self.sell_price, AMOUNT_PLACES),
            round_to(self.profit_percent, PERCENT_PLACES),
            round_to(self.raw_profit_percent, PERCENT_PLACES),
            round_to(self.transfer_cost_percent, PERCENT_PLACES),
            pp = PERCENT_PLACES as usize,
            ap = AMOUNT_PLACES as usize,
        )
    }
}

/// Either kind of opportunity, for callers that render both lists together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Opportunity {
    Triangular(TriangularOpportunity),
    CrossExchange(CrossExchangeOpportunity),
}

impl Display for Opportunity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Opportunity::Triangular(opportunity) => write!(f, "[triangular] {opportunity}"),
            Opportunity::CrossExchange(opportunity) => write!(f, "[cross-exchange] {opportunity}"),
        }
    }
}

impl From<TriangularOpportunity> for Opportunity {
    fn from(opportunity: TriangularOpportunity) -> Self {
        Opportunity::Triangular(opportunity)
    }
}

impl From<CrossExchangeOpportunity> for Opportunity {
    fn from(opportunity: CrossExchangeOpportunity) -> Self {
        Opportunity::CrossExchange(opportunity)
    }
}
