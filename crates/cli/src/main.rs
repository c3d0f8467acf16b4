use std::{process::ExitCode, time::Duration};

use clap::Parser as _;
use color_eyre::eyre::{self, eyre};
use tokio::{
    select,
    signal::unix::{SignalKind, signal},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

use crate::cli::Cli;

mod cli;
mod mock_quotes;
mod render;
mod scan;
mod snapshot_file;
mod telemetry;
mod watch;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = color_eyre::install() {
        eprintln!("failed to install error reporter: {err}");
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();

    let config = match cli.load_config() {
        Err(err) => {
            eprintln!("failed to read config:\n{err:?}");
            return ExitCode::FAILURE;
        }
        Ok(config) => config,
    };

    let subscriber = match telemetry::get_subscriber(&config.log_level) {
        Ok(subscriber) => subscriber,
        Err(err) => {
            eprintln!("failed to set up logging:\n{err:?}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = telemetry::init_subscriber(subscriber) {
        eprintln!("failed to set up logging:\n{err:?}");
        return ExitCode::FAILURE;
    }
    debug!(?config, "starting with config");

    let sigterm = signal(SignalKind::terminate());
    let sigint = signal(SignalKind::interrupt());
    let (mut sigterm, mut sigint) = match (sigterm, sigint) {
        (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
        (Err(e), _) | (_, Err(e)) => {
            error!(%e, "failed to install signal listeners");
            return ExitCode::FAILURE;
        }
    };

    let shutdown_token = CancellationToken::new();
    let mut command = tokio::spawn(cli.run(config, shutdown_token.clone()));

    let exit_reason = select! {
        _ = sigterm.recv() => "received SIGTERM",
        _ = sigint.recv() => "received SIGINT",
        res = &mut command => {
            return match res.map_err(|e| eyre!(e)).and_then(|res| res) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!(error = ?e, "command failed");
                    ExitCode::FAILURE
                }
            };
        }
    };

    shutdown(exit_reason, shutdown_token, command).await
}

#[instrument(skip_all)]
async fn shutdown(
    reason: &str,
    shutdown_token: CancellationToken,
    mut command: JoinHandle<eyre::Result<()>>,
) -> ExitCode {
    const WAIT_BEFORE_ABORT: Duration = Duration::from_secs(5);

    info!(
        reason,
        "waiting {} for the running command before aborting",
        humantime::format_duration(WAIT_BEFORE_ABORT)
    );
    shutdown_token.cancel();

    let exit_code = match tokio::time::timeout(WAIT_BEFORE_ABORT, &mut command).await {
        Ok(Ok(Ok(()))) => ExitCode::SUCCESS,
        Ok(Ok(Err(e))) => {
            warn!(%e, "command failed while shutting down");
            ExitCode::FAILURE
        }
        Ok(Err(e)) => {
            warn!(%e, "command panicked while shutting down");
            ExitCode::FAILURE
        }
        Err(_) => {
            warn!("command did not stop in time, aborting");
            command.abort();
            ExitCode::FAILURE
        }
    };
    info!("shutdown complete");
    exit_code
}
