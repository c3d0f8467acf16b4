use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::{Asset, ExchangeId, ExchangeQuotes, is_valid_price};

/// Cheapest and dearest quote for one asset across exchanges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpotPrices {
    pub asset: Asset,
    pub min_price: f64,
    pub max_price: f64,
    pub min_exchange: ExchangeId,
    pub max_exchange: ExchangeId,
}

impl SpotPrices {
    /// Finds the price extremes in `quotes`.
    ///
    /// Ties go to the exchange listed first. Returns `None` when there are
    /// fewer than two quotes, when any quote is unusable (non-finite or not
    /// positive), or when the extremes land on the same exchange.
    pub fn from_quotes(asset: &Asset, quotes: &ExchangeQuotes) -> Option<Self> {
        if quotes.len() < 2 {
            debug!(%asset, quotes = quotes.len(), "fewer than two exchange quotes, skipping asset");
            return None;
        }

        if let Some((exchange, price)) = quotes.iter().find(|(_, price)| !is_valid_price(*price)) {
            debug!(%asset, %exchange, %price, "invalid exchange quote, skipping asset");
            return None;
        }

        let mut iter = quotes.iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);

        for (exchange, price) in iter {
            // strict comparisons keep the earliest exchange on ties
            if price < min.1 {
                min = (exchange, price);
            }
            if price > max.1 {
                max = (exchange, price);
            }
        }

        if min.0 == max.0 {
            debug!(%asset, exchange = %min.0, "all quotes equal, no spread");
            return None;
        }

        Some(Self {
            asset: asset.clone(),
            min_price: min.1,
            max_price: max.1,
            min_exchange: min.0.clone(),
            max_exchange: max.0.clone(),
        })
    }

    /// Spread between the extremes as a percentage of the buy price.
    pub fn spread_percent(&self) -> f64 {
        (self.max_price / self.min_price - 1.0) * 100.0
    }
}
