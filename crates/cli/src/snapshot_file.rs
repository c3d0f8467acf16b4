use std::path::Path;

use arbscan_core::state::RateSnapshot;
use color_eyre::eyre::{self, Context as _};
use tokio::fs;
use tracing::{debug, instrument};

/// Reads a JSON snapshot and logs every entry the engine will ignore.
#[instrument(skip_all, fields(path = %path.display()))]
pub(crate) async fn load(path: &Path) -> eyre::Result<RateSnapshot> {
    let raw = fs::read(path)
        .await
        .wrap_err_with(|| format!("failed to read snapshot file {}", path.display()))?;

    let snapshot =
        parse(&raw).wrap_err_with(|| format!("malformed snapshot file {}", path.display()))?;

    let unusable = snapshot.report_unusable_entries();
    debug!(
        assets = snapshot.rates_to_reference.len(),
        quoted_assets = snapshot.exchange_quotes.len(),
        direct_rates = snapshot.direct_rates.len(),
        unusable,
        "loaded snapshot"
    );
    Ok(snapshot)
}

pub(crate) fn parse(raw: &[u8]) -> eyre::Result<RateSnapshot> {
    Ok(serde_json::from_slice(raw)?)
}

#[cfg(test)]
mod tests {
    use arbscan_core::state::{Asset, ExchangeId};

    use super::*;

    const SNAPSHOT: &str = r#"{
        "rates_to_reference": { "USD": 1.0, "BTC": 50000.0, "ETH": 3000.0 },
        "exchange_quotes": {
            "BTC": { "kraken": 50100.0, "binance": 49900.0, "coinbase": 50000.0 }
        },
        "direct_rates": [ { "from": "BTC", "to": "ETH", "rate": 16.5 } ]
    }"#;

    #[test]
    fn parses_snapshot_keeping_exchange_order() {
        let snapshot = parse(SNAPSHOT.as_bytes()).unwrap();

        assert_eq!(snapshot.rate(&Asset::from("BTC")), Some(50_000.0));
        let exchanges: Vec<&ExchangeId> = snapshot
            .quotes(&Asset::from("BTC"))
            .unwrap()
            .iter()
            .map(|(exchange, _)| exchange)
            .collect();
        assert_eq!(
            exchanges,
            vec![
                &ExchangeId::from("kraken"),
                &ExchangeId::from("binance"),
                &ExchangeId::from("coinbase")
            ]
        );
        assert_eq!(snapshot.direct_rates.len(), 1);
    }

    #[test]
    fn quotes_and_direct_rates_are_optional() {
        let snapshot = parse(br#"{ "rates_to_reference": { "USD": 1.0 } }"#).unwrap();
        assert!(snapshot.exchange_quotes.is_empty());
        assert!(snapshot.direct_rates.is_empty());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(parse(b"{ \"rates_to_reference\": [1, 2] }").is_err());
        assert!(parse(b"not json").is_err());
    }

    #[tokio::test]
    async fn load_reports_missing_file() {
        let missing = std::env::temp_dir().join("arbscan-missing-snapshot.json");
        let err = load(&missing).await.unwrap_err();
        assert!(err.to_string().contains("failed to read snapshot file"));
    }
}
