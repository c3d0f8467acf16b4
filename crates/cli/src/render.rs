use std::io::Write;

use arbscan_core::{opportunity::Opportunity, strategy::ScanReport};
use color_eyre::eyre;

/// Human output is one line per opportunity in rank order; `json` prints the
/// records unrounded.
pub(crate) fn write_report(
    out: &mut impl Write,
    report: &ScanReport,
    json: bool,
) -> eyre::Result<()> {
    if json {
        let records: Vec<Opportunity> = report.opportunities().collect();
        serde_json::to_writer_pretty(&mut *out, &records)?;
        writeln!(out)?;
        return Ok(());
    }

    if report.is_empty() {
        writeln!(out, "no opportunities above threshold")?;
    }
    for opportunity in report.opportunities() {
        writeln!(out, "{opportunity}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use arbscan_core::opportunity::{CrossExchangeOpportunity, TriangularOpportunity};

    use super::*;

    fn report() -> ScanReport {
        ScanReport {
            triangular: vec![TriangularOpportunity {
                path: ["USD".into(), "ETH".into(), "BTC".into(), "USD".into()],
                hop_rates: [1.0 / 2_900.0, 0.06, 50_000.0],
                start_notional: 1_000.0,
                end_notional: 1_034.482_758_62,
                profit_percent: 3.448_275_862,
            }],
            cross_exchange: vec![CrossExchangeOpportunity {
                asset: "BTC".into(),
                buy_exchange: "A".into(),
                sell_exchange: "B".into(),
                buy_price: 60_000.0,
                sell_price: 60_600.0,
                raw_profit_percent: 1.0,
                transfer_cost_percent: 0.1,
                profit_percent: 0.9,
            }],
        }
    }

    fn render(report: &ScanReport, json: bool) -> String {
        let mut out = Vec::new();
        write_report(&mut out, report, json).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn human_lines_are_rounded() {
        let output = render(&report(), false);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("[triangular] USD → ETH → BTC → USD: +3.4483%"));
        assert!(lines[0].contains("1034.48275862 USD"));
        assert!(lines[1].starts_with("[cross-exchange] BTC: buy on A"));
        assert!(lines[1].contains("+0.9000%"));
    }

    #[test]
    fn empty_report_says_so() {
        let output = render(&ScanReport::default(), false);
        assert_eq!(output.trim(), "no opportunities above threshold");
        assert_eq!(render(&ScanReport::default(), true).trim(), "[]");
    }

    #[test]
    fn json_records_are_tagged() {
        let output = render(&report(), true);
        let records: Vec<serde_json::Value> = serde_json::from_str(&output).unwrap();

        assert_eq!(records[0]["kind"], "triangular");
        assert_eq!(records[1]["kind"], "cross_exchange");
        assert_eq!(records[1]["sell_exchange"], "B");
    }
}
