use std::collections::HashMap;

use color_eyre::eyre::{self, OptionExt as _, bail};
use serde::{Deserialize, Serialize};

use crate::state::Asset;

/// Key of the mandatory fallback entry in a serialized transfer-cost table.
pub const DEFAULT_TRANSFER_COST_KEY: &str = "default";

/// Cost of moving an asset from the buy exchange to the sell exchange.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferCost {
    /// `true`: `amount` is a fixed fee in units of the asset.
    /// `false`: `amount` is a percentage of the transferred value (0.1 = 0.1%).
    pub is_absolute: bool,
    pub amount: f64,
}

impl TransferCost {
    pub fn percent(amount: f64) -> Self {
        Self {
            is_absolute: false,
            amount,
        }
    }

    pub fn absolute(amount: f64) -> Self {
        Self {
            is_absolute: true,
            amount,
        }
    }

    /// Cost expressed as a percentage of a trade of `notional` reference units
    /// bought at `buy_price`.
    ///
    /// A fixed fee consumes `amount` of the `notional / buy_price` units
    /// acquired.
    pub fn as_percent(&self, notional: f64, buy_price: f64) -> f64 {
        if self.is_absolute {
            self.amount / (notional / buy_price) * 100.0
        } else {
            self.amount
        }
    }
}

/// Fees applied while evaluating opportunities.
#[derive(Debug, Clone, PartialEq)]
pub struct FeeModel {
    /// Fraction deducted at every conversion hop of a triangular cycle.
    pub per_hop_fee: f64,
    pub transfer_costs: HashMap<Asset, TransferCost>,
    pub default_transfer_cost: TransferCost,
}

impl FeeModel {
    pub fn new(per_hop_fee: f64, default_transfer_cost: TransferCost) -> Self {
        Self {
            per_hop_fee,
            transfer_costs: HashMap::new(),
            default_transfer_cost,
        }
    }

    pub fn with_transfer_cost(mut self, asset: impl Into<Asset>, cost: TransferCost) -> Self {
        self.transfer_costs.insert(asset.into(), cost);
        self
    }

    /// Builds a fee model from a table whose `default` key holds the fallback.
    pub fn from_table(
        per_hop_fee: f64,
        mut table: HashMap<String, TransferCost>,
    ) -> eyre::Result<Self> {
        let default_transfer_cost = table
            .remove(DEFAULT_TRANSFER_COST_KEY)
            .ok_or_eyre("transfer cost table is missing the `default` entry")?;

        Ok(Self {
            per_hop_fee,
            transfer_costs: table
                .into_iter()
                .map(|(symbol, cost)| (Asset::from(symbol), cost))
                .collect(),
            default_transfer_cost,
        })
    }

    pub fn transfer_cost(&self, asset: &Asset) -> TransferCost {
        self.transfer_costs
            .get(asset)
            .copied()
            .unwrap_or(self.default_transfer_cost)
    }

    /// Multiplier applied to a raw rate at each hop.
    pub fn hop_multiplier(&self) -> f64 {
        1.0 - self.per_hop_fee
    }

    pub fn validate(&self) -> eyre::Result<()> {
        if !(0.0..1.0).contains(&self.per_hop_fee) {
            bail!(
                "per hop fee must be a fraction in [0, 1), got {}",
                self.per_hop_fee
            );
        }

        let default = (DEFAULT_TRANSFER_COST_KEY, &self.default_transfer_cost);
        let explicit = self
            .transfer_costs
            .iter()
            .map(|(asset, cost)| (asset.as_str(), cost));
        for (asset, cost) in explicit.chain([default]) {
            if !cost.amount.is_finite() || cost.amount < 0.0 {
                bail!(
                    "transfer cost for {asset} must be a non-negative number, got {}",
                    cost.amount
                );
            }
        }

        Ok(())
    }
}
