use tracing::{debug, trace};

use crate::{
    fees::FeeModel,
    opportunity::CrossExchangeOpportunity,
    spot_prices::SpotPrices,
    state::{Asset, ExchangeQuotes, RateSnapshot},
};

/// Prices buying `asset` on its cheapest exchange and selling it on its
/// dearest one, net of the asset's transfer cost.
///
/// `notional` sizes fixed transfer costs. Only spreads that stay positive
/// after the transfer cost produce an opportunity.
pub fn scan_asset(
    asset: &Asset,
    quotes: &ExchangeQuotes,
    snapshot: &RateSnapshot,
    fees: &FeeModel,
    notional: f64,
) -> Option<CrossExchangeOpportunity> {
    if snapshot.rate(asset).is_none() {
        debug!(%asset, "missing reference rate, skipping exchange quotes");
        return None;
    }

    let spot = SpotPrices::from_quotes(asset, quotes)?;

    let raw_profit_percent = spot.spread_percent();
    let transfer_cost_percent = fees
        .transfer_cost(asset)
        .as_percent(notional, spot.min_price);
    let profit_percent = raw_profit_percent - transfer_cost_percent;

    trace!(
        %asset,
        buy.exchange = %spot.min_exchange,
        buy.price = %spot.min_price,
        sell.exchange = %spot.max_exchange,
        sell.price = %spot.max_price,
        %raw_profit_percent,
        %transfer_cost_percent,
        "evaluated cross-exchange spread"
    );

    if !(profit_percent.is_finite() && profit_percent > 0.0) {
        debug!(%asset, %profit_percent, "spread does not survive transfer cost");
        return None;
    }

    let SpotPrices {
        asset,
        min_price,
        max_price,
        min_exchange,
        max_exchange,
    } = spot;

    Some(CrossExchangeOpportunity {
        asset,
        buy_exchange: min_exchange,
        sell_exchange: max_exchange,
        buy_price: min_price,
        sell_price: max_price,
        raw_profit_percent,
        transfer_cost_percent,
        profit_percent,
    })
}
