// Logging setup for the CLI: tracing-subscriber with an EnvFilter.
//
// `--log-level` wins over RUST_LOG; with neither set the filter is `info`.
// Log lines go to stderr so stdout only carries the status lines.

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

/// Build the filter from an explicit directive, then RUST_LOG, then the default.
pub fn build_filter(level: Option<&str>) -> Result<EnvFilter> {
    match level {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("Invalid log level: {directive}")),
        None => Ok(EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))),
    }
}

/// Install the global subscriber. Call once, before any processing.
pub fn init(level: Option<&str>) -> Result<()> {
    let filter = build_filter(level)?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialise logging: {e}"))
}
