use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{Asset, ExchangeQuotes, is_valid_price};

/// A directly quoted cross rate: one unit of `from` buys `rate` units of `to`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectRate {
    pub from: Asset,
    pub to: Asset,
    pub rate: f64,
}

/// Immutable view of the market handed to the engine for one evaluation pass.
///
/// Assets iterate in ascending symbol order, which fixes the order in which
/// cycles are enumerated and exchange quotes are scanned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateSnapshot {
    /// Price of one unit of each asset in the common reference unit.
    pub rates_to_reference: BTreeMap<Asset, f64>,

    /// Per-exchange price quotes, only read by cross-exchange scanning.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub exchange_quotes: BTreeMap<Asset, ExchangeQuotes>,

    /// Cross rates quoted directly by the provider. They take precedence over
    /// rates derived from the reference unit.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub direct_rates: Vec<DirectRate>,
}

impl RateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rate(mut self, asset: impl Into<Asset>, rate: f64) -> Self {
        self.rates_to_reference.insert(asset.into(), rate);
        self
    }

    pub fn with_quotes(mut self, asset: impl Into<Asset>, quotes: ExchangeQuotes) -> Self {
        self.exchange_quotes.insert(asset.into(), quotes);
        self
    }

    pub fn with_direct_rate(
        mut self,
        from: impl Into<Asset>,
        to: impl Into<Asset>,
        rate: f64,
    ) -> Self {
        self.direct_rates.push(DirectRate {
            from: from.into(),
            to: to.into(),
            rate,
        });
        self
    }

    /// The asset universe: every symbol with an entry in `rates_to_reference`.
    pub fn assets(&self) -> impl Iterator<Item = &Asset> {
        self.rates_to_reference.keys()
    }

    /// Reference price of `asset`. Missing, non-finite and non-positive
    /// entries all read as "not convertible".
    pub fn rate(&self, asset: &Asset) -> Option<f64> {
        self.rates_to_reference
            .get(asset)
            .copied()
            .filter(|rate| is_valid_price(*rate))
    }

    pub fn quotes(&self, asset: &Asset) -> Option<&ExchangeQuotes> {
        self.exchange_quotes.get(asset)
    }

    /// Units of `to` received for one unit of `from`, before fees.
    ///
    /// A direct quote for `from -> to` wins, then the inverse of a direct
    /// quote for `to -> from`, then the ratio of the two reference prices.
    pub fn raw_rate(&self, from: &Asset, to: &Asset) -> Option<f64> {
        if let Some(direct) = self.direct_rate(from, to) {
            return Some(direct);
        }
        if let Some(inverse) = self.direct_rate(to, from) {
            return Some(1.0 / inverse);
        }
        Some(self.rate(from)? / self.rate(to)?)
    }

    fn direct_rate(&self, from: &Asset, to: &Asset) -> Option<f64> {
        self.direct_rates
            .iter()
            .filter(|direct| direct.from == *from && direct.to == *to)
            .map(|direct| direct.rate)
            .find(|rate| is_valid_price(*rate))
    }

    /// Logs every entry the engine will ignore and returns how many there are.
    pub fn report_unusable_entries(&self) -> usize {
        let mut unusable = 0;

        for (asset, rate) in &self.rates_to_reference {
            if !is_valid_price(*rate) {
                warn!(
                    %asset,
                    %rate,
                    "reference rate is not a positive finite number, asset treated as missing"
                );
                unusable += 1;
            }
        }

        for (asset, quotes) in &self.exchange_quotes {
            if quotes.is_empty() {
                warn!(%asset, "exchange quotes present but empty");
                unusable += 1;
            }
        }

        for direct in &self.direct_rates {
            if !is_valid_price(direct.rate) {
                warn!(
                    from = %direct.from,
                    to = %direct.to,
                    rate = %direct.rate,
                    "direct rate ignored"
                );
                unusable += 1;
            }
        }

        unusable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_rate_derives_from_reference() {
        let snapshot = RateSnapshot::new()
            .with_rate("BTC", 50_000.0)
            .with_rate("USD", 1.0);

        let usd_to_btc = snapshot
            .raw_rate(&Asset::from("USD"), &Asset::from("BTC"))
            .unwrap();
        assert_eq!(usd_to_btc, 1.0 / 50_000.0);
    }

    #[test]
    fn raw_rate_prefers_direct_quotes() {
        let snapshot = RateSnapshot::new()
            .with_rate("BTC", 50_000.0)
            .with_rate("ETH", 2_900.0)
            .with_direct_rate("BTC", "ETH", 16.0);

        let (btc, eth) = (Asset::from("BTC"), Asset::from("ETH"));
        assert_eq!(snapshot.raw_rate(&btc, &eth), Some(16.0));
        assert_eq!(snapshot.raw_rate(&eth, &btc), Some(1.0 / 16.0));
    }

    #[test]
    fn invalid_entries_read_as_missing() {
        let snapshot = RateSnapshot::new()
            .with_rate("USD", 1.0)
            .with_rate("ZERO", 0.0)
            .with_rate("NAN", f64::NAN)
            .with_direct_rate("USD", "NAN", -3.0);

        assert_eq!(snapshot.rate(&Asset::from("ZERO")), None);
        assert_eq!(snapshot.rate(&Asset::from("NAN")), None);
        assert_eq!(snapshot.rate(&Asset::from("MISSING")), None);
        assert_eq!(
            snapshot.raw_rate(&Asset::from("USD"), &Asset::from("NAN")),
            None
        );
        assert_eq!(snapshot.report_unusable_entries(), 3);
    }

    #[test]
    fn deserializes_without_optional_sections() {
        let raw = r#"{"rates_to_reference": {"USD": 1.0, "BTC": 50000.0}}"#;
        let snapshot: RateSnapshot = serde_json::from_str(raw).unwrap();

        assert!(snapshot.exchange_quotes.is_empty());
        assert!(snapshot.direct_rates.is_empty());
        let assets: Vec<&str> = snapshot.assets().map(Asset::as_str).collect();
        assert_eq!(assets, vec!["BTC", "USD"]);
    }
}
