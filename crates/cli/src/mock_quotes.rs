use std::{io::Write, path::PathBuf};

use arbscan_core::{
    config::Config,
    state::{ExchangeId, ExchangeQuotes, RateSnapshot},
};
use color_eyre::eyre::{self, bail};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info};

use crate::snapshot_file;

#[derive(clap::Args, Debug, Clone)]
pub(crate) struct MockQuotes {
    /// JSON rate snapshot providing `rates_to_reference`
    #[arg(long)]
    snapshot: PathBuf,

    /// Seed for reproducible quotes
    #[arg(long)]
    seed: Option<u64>,

    /// Largest deviation of a quote from the reference rate, in percent
    #[arg(long, default_value_t = 1.0)]
    max_deviation: f64,
}

impl MockQuotes {
    pub(crate) async fn run(&self, config: &Config, out: &mut impl Write) -> eyre::Result<()> {
        let exchanges = config.exchange_ids();
        if exchanges.is_empty() {
            bail!("no exchanges configured, nothing to quote");
        }
        if !(0.0..100.0).contains(&self.max_deviation) {
            bail!(
                "max deviation must be in [0, 100) percent, got {}",
                self.max_deviation
            );
        }

        let snapshot = snapshot_file::load(&self.snapshot).await?;
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mocked = with_mock_quotes(snapshot, &exchanges, self.max_deviation, &mut rng);
        info!(
            quoted_assets = mocked.exchange_quotes.len(),
            exchanges = exchanges.len(),
            "generated mock quotes"
        );

        serde_json::to_writer_pretty(&mut *out, &mocked)?;
        writeln!(out)?;
        Ok(())
    }
}

/// Quotes every asset with a usable reference rate on each of `exchanges` at
/// `rate * (1 + d / 100)`, `d` drawn uniformly from
/// `[-max_deviation, max_deviation]`. Existing quotes are replaced.
pub(crate) fn with_mock_quotes(
    mut snapshot: RateSnapshot,
    exchanges: &[ExchangeId],
    max_deviation: f64,
    rng: &mut impl Rng,
) -> RateSnapshot {
    let priced: Vec<_> = snapshot
        .rates_to_reference
        .keys()
        .filter_map(|asset| match snapshot.rate(asset) {
            Some(rate) => Some((asset.clone(), rate)),
            None => {
                debug!(%asset, "no usable reference rate, not quoting");
                None
            }
        })
        .collect();

    for (asset, rate) in priced {
        let quotes: ExchangeQuotes = exchanges
            .iter()
            .map(|exchange| {
                let deviation = rng.gen_range(-max_deviation..=max_deviation);
                (exchange.clone(), rate * (1.0 + deviation / 100.0))
            })
            .collect();
        snapshot.exchange_quotes.insert(asset, quotes);
    }
    snapshot
}

#[cfg(test)]
mod tests {
    use arbscan_core::state::Asset;

    use super::*;

    fn exchanges() -> Vec<ExchangeId> {
        ["binance", "kraken", "coinbase"]
            .into_iter()
            .map(ExchangeId::from)
            .collect()
    }

    fn snapshot() -> RateSnapshot {
        RateSnapshot::new()
            .with_rate("BTC", 50_000.0)
            .with_rate("ETH", 3_000.0)
            .with_rate("DEAD", 0.0)
    }

    fn mock(max_deviation: f64, seed: u64) -> RateSnapshot {
        let mut rng = StdRng::seed_from_u64(seed);
        with_mock_quotes(snapshot(), &exchanges(), max_deviation, &mut rng)
    }

    #[test]
    fn quotes_stay_within_deviation() {
        let mocked = mock(2.0, 7);

        let btc = mocked.quotes(&Asset::from("BTC")).unwrap();
        assert_eq!(btc.len(), 3);
        let order: Vec<&str> = btc.iter().map(|(exchange, _)| exchange.as_str()).collect();
        assert_eq!(order, vec!["binance", "kraken", "coinbase"]);
        for (_, price) in btc.iter() {
            assert!((49_000.0..=51_000.0).contains(&price));
        }
        assert!(mocked.quotes(&Asset::from("DEAD")).is_none());
    }

    #[test]
    fn same_seed_same_quotes() {
        assert_eq!(mock(1.0, 42), mock(1.0, 42));
    }

    #[test]
    fn zero_deviation_copies_reference_rate() {
        let mocked = mock(0.0, 1);
        let eth = mocked.quotes(&Asset::from("ETH")).unwrap();
        assert!(eth.iter().all(|(_, price)| price == 3_000.0));
    }

    #[tokio::test]
    async fn rejects_out_of_range_deviation() {
        let command = MockQuotes {
            snapshot: PathBuf::from("unused.json"),
            seed: Some(1),
            max_deviation: 150.0,
        };
        let mut out = Vec::new();
        let err = command
            .run(&crate::scan::tests::config(), &mut out)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("max deviation"));
    }
}
