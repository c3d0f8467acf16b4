use std::{
    io::Write,
    path::{Path, PathBuf},
    time::Duration,
};

use arbscan_core::{config::Config, strategy::Engine};
use color_eyre::eyre::{self, bail};
use tokio::{
    select,
    time::{self, MissedTickBehavior},
};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::{
    render,
    scan::{EngineArgs, Mode},
    snapshot_file,
};

#[derive(clap::Args, Debug, Clone)]
pub(crate) struct Watch {
    /// JSON rate snapshot, re-read before every pass
    #[arg(long)]
    snapshot: PathBuf,

    /// Time between passes, e.g. "30s". Defaults to `refresh_interval`
    #[arg(long)]
    interval: Option<humantime::Duration>,

    #[command(flatten)]
    engine: EngineArgs,
}

impl Watch {
    pub(crate) async fn run(
        &self,
        config: &Config,
        shutdown_token: CancellationToken,
        out: &mut (impl Write + Send),
    ) -> eyre::Result<()> {
        let engine = self.engine.build(config)?;
        let period = match self.interval {
            Some(interval) => interval.into(),
            None => config.refresh_interval()?,
        };

        watch_loop(&engine, &self.snapshot, period, shutdown_token, out).await?;
        Ok(())
    }
}

/// Runs both modes every `period` until `shutdown_token` fires and returns the
/// number of passes.
///
/// A pass always finishes before the next tick is awaited; ticks missed while
/// a pass runs are dropped. A pass that fails is logged and the loop goes on.
#[instrument(skip_all, fields(
    snapshot = %snapshot.display(),
    period = %humantime::format_duration(period),
))]
pub(crate) async fn watch_loop(
    engine: &Engine,
    snapshot: &Path,
    period: Duration,
    shutdown_token: CancellationToken,
    out: &mut (impl Write + Send),
) -> eyre::Result<u64> {
    if period.is_zero() {
        bail!("watch interval must be greater than zero");
    }

    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    info!("watching snapshot");
    let mut passes = 0;
    loop {
        select! {
            biased;

            () = shutdown_token.cancelled() => break,

            _ = ticker.tick() => {
                passes += 1;
                if let Err(e) = pass(engine, snapshot, passes, out).await {
                    warn!(pass = passes, error = %e, "pass failed");
                }
            }
        }
    }

    info!(passes, "received shutdown signal, stopped watching");
    Ok(passes)
}

async fn pass(
    engine: &Engine,
    snapshot: &Path,
    number: u64,
    out: &mut impl Write,
) -> eyre::Result<()> {
    let snapshot = snapshot_file::load(snapshot).await?;
    let report = Mode::Both.run(engine, &snapshot)?;

    writeln!(out, "--- pass {number}: {} opportunities", report.len())?;
    render::write_report(out, &report, false)?;
    out.flush()?;
    Ok(())
}
