use std::sync::OnceLock;

use color_eyre::eyre::{self, Context as _};
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _};

static TELEMETRY_INIT: OnceLock<()> = OnceLock::new();

/// `RUST_LOG` wins over `fallback_level`, which comes from the config file.
pub fn get_subscriber(fallback_level: &str) -> eyre::Result<impl Subscriber + Send + Sync> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(fallback_level)
            .wrap_err_with(|| format!("invalid log level `{fallback_level}`"))?,
    };

    // stdout carries command output, logs go to stderr
    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true);

    Ok(tracing_subscriber::Registry::default()
        .with(filter)
        .with(fmt_layer))
}

pub fn init_subscriber(subscriber: impl Subscriber + Send + Sync) -> eyre::Result<()> {
    if TELEMETRY_INIT.set(()).is_err() {
        eyre::bail!("global tracing subscriber already set");
    }
    tracing::subscriber::set_global_default(subscriber)
        .wrap_err("setting default subscriber failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_fallback_level() {
        // only meaningful without RUST_LOG overriding the fallback
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(get_subscriber("arbscan=loud").is_err());
        }
        assert!(get_subscriber("debug").is_ok());
    }
}
