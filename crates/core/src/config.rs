use std::{collections::HashMap, path::Path, time::Duration};

use color_eyre::eyre::{self, Context as _, bail};
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    fees::{FeeModel, TransferCost},
    state::{Asset, ExchangeId},
};

const CONFIG_FILE: &str = "arbscan.yaml";
const ENV_PREFIX: &str = "ARBSCAN_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Fallback log directive when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Opportunities below this profit percentage are discarded
    pub min_profit_percent: f64,

    /// Amount of the base asset a triangular cycle starts with; also sizes
    /// fixed transfer costs in cross-exchange mode
    pub start_notional: f64,

    /// Assets triangular cycles start and end at
    pub base_assets: Vec<String>,

    /// Fraction deducted at every conversion hop (0.001 = 0.1%)
    pub per_hop_fee: f64,

    /// Transfer costs by asset symbol, must contain a `default` entry
    pub transfer_costs: HashMap<String, TransferCost>,

    /// Exchanges the mock quote generator fabricates prices for
    #[serde(default)]
    pub exchanges: Vec<String>,

    /// How often watch mode re-reads the snapshot, e.g. "60s"
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_refresh_interval() -> String {
    "60s".to_string()
}

impl Config {
    /// Load configuration from `arbscan.yaml` and `ARBSCAN_` prefixed env vars
    pub fn load() -> Result<Self, figment::Error> {
        Self::from_figment(Figment::new().merge(Yaml::file(CONFIG_FILE)))
    }

    /// Same as [`Config::load`] with an explicit config file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, figment::Error> {
        Self::from_figment(Figment::new().merge(Yaml::file(path.as_ref())))
    }

    fn from_figment(figment: Figment) -> Result<Self, figment::Error> {
        figment.merge(Env::prefixed(ENV_PREFIX)).extract()
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            min_profit_percent: self.min_profit_percent,
            start_notional: self.start_notional,
            base_assets: self.base_assets.iter().cloned().map(Asset::from).collect(),
        }
    }

    pub fn fee_model(&self) -> eyre::Result<FeeModel> {
        FeeModel::from_table(self.per_hop_fee, self.transfer_costs.clone())
            .wrap_err("failed to build fee model from config")
    }

    pub fn exchange_ids(&self) -> Vec<ExchangeId> {
        self.exchanges
            .iter()
            .map(|s| ExchangeId::from(s.as_str()))
            .collect()
    }

    pub fn refresh_interval(&self) -> eyre::Result<Duration> {
        humantime::parse_duration(&self.refresh_interval)
            .wrap_err_with(|| format!("invalid refresh interval `{}`", self.refresh_interval))
    }
}

/// Per-pass engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub min_profit_percent: f64,
    pub start_notional: f64,
    pub base_assets: Vec<Asset>,
}

impl EngineConfig {
    pub fn validate(&self) -> eyre::Result<()> {
        if !self.start_notional.is_finite() || self.start_notional <= 0.0 {
            bail!(
                "start notional must be a positive number, got {}",
                self.start_notional
            );
        }
        if !self.min_profit_percent.is_finite() {
            bail!(
                "minimum profit percent must be a finite number, got {}",
                self.min_profit_percent
            );
        }
        if self.base_assets.is_empty() {
            info!("no base assets configured, triangular mode will find nothing");
        }
        Ok(())
    }
}
