use std::{io::Write, path::PathBuf};

use arbscan_core::{
    config::Config,
    state::RateSnapshot,
    strategy::{Builder, Engine, ScanReport},
};
use color_eyre::eyre;

use crate::{render, snapshot_file};

/// Threshold and notional overrides shared by every command that runs the
/// engine.
#[derive(clap::Args, Debug, Clone, Default)]
pub(crate) struct EngineArgs {
    /// Overrides `min_profit_percent` from the config
    #[arg(long, allow_negative_numbers = true)]
    pub min_profit: Option<f64>,

    /// Overrides `start_notional` from the config
    #[arg(long)]
    pub notional: Option<f64>,
}

impl EngineArgs {
    pub(crate) fn build(&self, config: &Config) -> eyre::Result<Engine> {
        let mut builder = Builder::from_config(config)?;
        if let Some(min_profit) = self.min_profit {
            builder.config.min_profit_percent = min_profit;
        }
        if let Some(notional) = self.notional {
            builder.config.start_notional = notional;
        }
        builder.build()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Triangular,
    CrossExchange,
    Both,
}

impl Mode {
    pub(crate) fn run(self, engine: &Engine, snapshot: &RateSnapshot) -> eyre::Result<ScanReport> {
        match self {
            Mode::Triangular => Ok(ScanReport {
                triangular: engine.find_triangular_opportunities(snapshot)?,
                ..Default::default()
            }),
            Mode::CrossExchange => Ok(ScanReport {
                cross_exchange: engine.find_cross_exchange_opportunities(snapshot)?,
                ..Default::default()
            }),
            Mode::Both => engine.scan(snapshot),
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub(crate) struct ScanArgs {
    /// JSON rate snapshot to evaluate
    #[arg(long)]
    pub snapshot: PathBuf,

    /// Print opportunities as JSON instead of one line each
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub engine: EngineArgs,
}

impl ScanArgs {
    pub(crate) async fn run(
        &self,
        mode: Mode,
        config: &Config,
        out: &mut impl Write,
    ) -> eyre::Result<()> {
        let engine = self.engine.build(config)?;
        let snapshot = snapshot_file::load(&self.snapshot).await?;
        let report = mode.run(&engine, &snapshot)?;
        render::write_report(out, &report, self.json)
    }
}
