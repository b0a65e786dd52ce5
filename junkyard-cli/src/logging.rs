//! Tracing setup for the `junkyard` binary.
//!
//! Driven by `[general] log_level` / `log_format`. Everything is written to
//! stderr; stdout is reserved for command reports.

use anyhow::{Context, Result, bail};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use junkyard_core::config::GeneralConfig;

/// Installs the global subscriber. Call once, before the first event.
///
/// `RUST_LOG` wins over `log_level`. `log_format` is `json` (one object per
/// line) or `pretty`.
pub fn init_tracing(config: &GeneralConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .with_context(|| format!("invalid log level '{}'", config.log_level))?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match config.log_format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        "pretty" => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
        other => bail!("unknown log format '{other}', expected 'json' or 'pretty'"),
    };

    installed.with_context(|| format!("failed to install {} log subscriber", config.log_format))
}
