//! # Logging
//!
//! `tracing` subscriber for the CLI. Logs go to stderr so the report on
//! stdout stays machine-readable.
//!
//! Filter precedence: `RUST_LOG`, then `-v` flags, then `PWREP_LOG_LEVEL`.

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Level selected by the number of `-v` flags, if any
pub fn verbosity_level(verbosity: u8) -> Option<&'static str> {
    match verbosity {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Build the filter used by [`init_logging`]
pub fn build_filter(default_level: &str, verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = verbosity_level(verbosity).unwrap_or(default_level);
        EnvFilter::new(format!("secret_expiry_reporter={level},pwrep={level}"))
    })
}

/// Install the global subscriber
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(default_level: &str, verbosity: u8) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(default_level, verbosity))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to initialize logging: {e}"))
}
