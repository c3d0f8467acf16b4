//! Arbitrage opportunity detection over a rate snapshot.
//!
//! Two independent modes run against the same [`RateSnapshot`]:
//! - triangular: enumerate `base -> X -> Y -> base` cycles, compound a
//!   starting notional through fee-adjusted hop rates, keep the profitable
//!   ones.
//! - cross-exchange: for each asset, buy on the cheapest exchange and sell on
//!   the dearest one, net of the transfer cost.
//!
//! Both modes finish with the same ranking step. A pass is a pure function of
//! its inputs: nothing is cached between calls and no randomness is involved.

use color_eyre::eyre::{self, Context as _};
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::{
    config::EngineConfig,
    fees::FeeModel,
    opportunity::{CrossExchangeOpportunity, Opportunity, TriangularOpportunity},
    state::RateSnapshot,
};

mod builder;
pub mod cross_exchange;
pub mod cycles;
pub mod ranking;
pub mod triangular;

pub use builder::Builder;
pub use cycles::{Cycle, CycleEnumerator};

fn validate(fees: &FeeModel, config: &EngineConfig) -> eyre::Result<()> {
    config.validate().wrap_err("invalid engine config")?;
    fees.validate().wrap_err("invalid fee model")
}

/// Ranked triangular opportunities found in `snapshot`.
///
/// # Errors
/// Fails before any enumeration when the fee model or the config is invalid.
/// Cycles touching assets without a usable rate are skipped silently.
#[instrument(skip_all, fields(
    assets = snapshot.rates_to_reference.len(),
    bases = config.base_assets.len(),
    min_profit_percent = %config.min_profit_percent,
))]
pub fn find_triangular_opportunities(
    snapshot: &RateSnapshot,
    fees: &FeeModel,
    config: &EngineConfig,
) -> eyre::Result<Vec<TriangularOpportunity>> {
    validate(fees, config)?;

    let cycles = CycleEnumerator::new(snapshot.assets(), &config.base_assets).cycles();
    let candidates: Vec<TriangularOpportunity> = cycles
        .iter()
        .filter_map(|cycle| {
            triangular::evaluate_cycle(cycle, snapshot, fees, config.start_notional)
        })
        .collect();

    debug!(
        cycles = cycles.len(),
        evaluated = candidates.len(),
        "evaluated triangular cycles"
    );

    Ok(ranking::rank(candidates, config.min_profit_percent))
}

/// Ranked cross-exchange opportunities found in `snapshot`.
///
/// # Errors
/// Fails before scanning when the fee model or the config is invalid. Assets
/// with a single quote, an invalid quote or no reference rate are skipped.
#[instrument(skip_all, fields(
    quoted_assets = snapshot.exchange_quotes.len(),
    min_profit_percent = %config.min_profit_percent,
))]
pub fn find_cross_exchange_opportunities(
    snapshot: &RateSnapshot,
    fees: &FeeModel,
    config: &EngineConfig,
) -> eyre::Result<Vec<CrossExchangeOpportunity>> {
    validate(fees, config)?;

    let candidates: Vec<CrossExchangeOpportunity> = snapshot
        .exchange_quotes
        .iter()
        .filter_map(|(asset, quotes)| {
            cross_exchange::scan_asset(asset, quotes, snapshot, fees, config.start_notional)
        })
        .collect();

    debug!(spreads = candidates.len(), "scanned exchange quotes");

    Ok(ranking::rank(candidates, config.min_profit_percent))
}

/// Results of running both modes on one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScanReport {
    pub triangular: Vec<TriangularOpportunity>,
    pub cross_exchange: Vec<CrossExchangeOpportunity>,
}

impl ScanReport {
    pub fn len(&self) -> usize {
        self.triangular.len() + self.cross_exchange.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Triangular records first, then cross-exchange ones, each in rank order.
    pub fn opportunities(&self) -> impl Iterator<Item = Opportunity> + '_ {
        self.triangular
            .iter()
            .cloned()
            .map(Opportunity::from)
            .chain(self.cross_exchange.iter().cloned().map(Opportunity::from))
    }
}

/// Holds the most recent fee model and config; snapshots are passed per call.
#[derive(Debug, Clone)]
pub struct Engine {
    fees: FeeModel,
    config: EngineConfig,
}

impl Engine {
    pub fn new(fees: FeeModel, config: EngineConfig) -> eyre::Result<Self> {
        Builder { fees, config }.build()
    }

    pub fn fees(&self) -> &FeeModel {
        &self.fees
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replaces the configuration. The previous one is kept if the new one is
    /// invalid.
    pub fn reconfigure(&mut self, fees: FeeModel, config: EngineConfig) -> eyre::Result<()> {
        validate(&fees, &config)?;
        self.fees = fees;
        self.config = config;
        Ok(())
    }

    pub fn find_triangular_opportunities(
        &self,
        snapshot: &RateSnapshot,
    ) -> eyre::Result<Vec<TriangularOpportunity>> {
        find_triangular_opportunities(snapshot, &self.fees, &self.config)
    }

    pub fn find_cross_exchange_opportunities(
        &self,
        snapshot: &RateSnapshot,
    ) -> eyre::Result<Vec<CrossExchangeOpportunity>> {
        find_cross_exchange_opportunities(snapshot, &self.fees, &self.config)
    }

    #[instrument(skip_all)]
    pub fn scan(&self, snapshot: &RateSnapshot) -> eyre::Result<ScanReport> {
        let report = ScanReport {
            triangular: self.find_triangular_opportunities(snapshot)?,
            cross_exchange: self.find_cross_exchange_opportunities(snapshot)?,
        };

        info!(
            triangular = report.triangular.len(),
            cross_exchange = report.cross_exchange.len(),
            "scan complete"
        );
        Ok(report)
    }
}
