use std::{io, path::PathBuf};

use arbscan_core::config::Config;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{self, Context as _};
use tokio_util::sync::CancellationToken;

use crate::{
    mock_quotes::MockQuotes,
    scan::{Mode, ScanArgs},
    watch::Watch,
};

#[derive(Parser, Debug)]
#[command(name = "arbscan", version, about)]
pub(crate) struct Cli {
    /// Config file, defaults to `arbscan.yaml` in the working directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Find triangular cycles that compound above the threshold
    Triangular(ScanArgs),

    /// Find assets priced apart across exchanges
    CrossExchange(ScanArgs),

    /// Run both modes once
    Scan(ScanArgs),

    /// Re-read a snapshot on a timer and run both modes each time
    Watch(Watch),

    /// Fill a snapshot with randomized per-exchange quotes and print it
    MockQuotes(MockQuotes),
}

impl Cli {
    pub(crate) fn load_config(&self) -> eyre::Result<Config> {
        match &self.config {
            Some(path) => Config::load_from(path)
                .wrap_err_with(|| format!("failed to load config from {}", path.display())),
            None => Config::load().wrap_err("failed to load config"),
        }
    }

    pub(crate) async fn run(
        self,
        config: Config,
        shutdown_token: CancellationToken,
    ) -> eyre::Result<()> {
        let mut stdout = io::stdout();

        match self.command {
            Commands::Triangular(args) => args.run(Mode::Triangular, &config, &mut stdout).await,
            Commands::CrossExchange(args) => {
                args.run(Mode::CrossExchange, &config, &mut stdout).await
            }
            Commands::Scan(args) => args.run(Mode::Both, &config, &mut stdout).await,
            Commands::Watch(cmd) => cmd.run(&config, shutdown_token, &mut stdout).await,
            Commands::MockQuotes(cmd) => cmd.run(&config, &mut stdout).await,
        }
    }
}
