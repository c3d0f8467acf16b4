use tracing::{debug, trace};

use super::cycles::Cycle;
use crate::{fees::FeeModel, opportunity::TriangularOpportunity, state::RateSnapshot};

/// Walks `cycle` with `start_notional` units of its base asset, deducting the
/// per-hop fee at every conversion.
///
/// Returns `None` when any asset of the cycle has no usable reference rate;
/// such cycles are dropped, not reported as losses. The profit is the growth
/// of the hop rates alone, so it stays finite even when `end_notional`
/// overflows.
pub fn evaluate_cycle(
    cycle: &Cycle<'_>,
    snapshot: &RateSnapshot,
    fees: &FeeModel,
    start_notional: f64,
) -> Option<TriangularOpportunity> {
    if let Some(missing) = [cycle.base, cycle.first, cycle.second]
        .into_iter()
        .find(|asset| snapshot.rate(asset).is_none())
    {
        debug!(%cycle, asset = %missing, "missing reference rate, skipping cycle");
        return None;
    }

    let mut hop_rates = [0.0; 3];
    for (rate, (from, to)) in hop_rates.iter_mut().zip(cycle.hops()) {
        *rate = snapshot.raw_rate(from, to)? * fees.hop_multiplier();
    }

    let growth: f64 = hop_rates.iter().product();
    let profit_percent = (growth - 1.0) * 100.0;
    if !profit_percent.is_finite() {
        debug!(%cycle, %growth, "non-finite cycle growth, skipping cycle");
        return None;
    }

    let end_notional = hop_rates
        .iter()
        .fold(start_notional, |amount, rate| amount * rate);

    trace!(%cycle, ?hop_rates, %end_notional, %profit_percent, "evaluated cycle");

    Some(TriangularOpportunity {
        path: cycle.path(),
        hop_rates,
        start_notional,
        end_notional,
        profit_percent,
    })
}
