use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub mod quotes;
pub mod snapshot;

pub use quotes::ExchangeQuotes;
pub use snapshot::{DirectRate, RateSnapshot};

/// Symbol of a tradeable unit, crypto or fiat (e.g. `BTC`, `USD`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Asset(String);

impl Asset {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Asset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Asset {
    fn from(symbol: String) -> Self {
        Self(symbol)
    }
}

impl From<&str> for Asset {
    fn from(symbol: &str) -> Self {
        Self(symbol.to_string())
    }
}

/// Name of an exchange quoting prices in the reference unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExchangeId(String);

impl ExchangeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ExchangeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ExchangeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for ExchangeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// A usable price: finite and strictly positive.
pub(crate) fn is_valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}
