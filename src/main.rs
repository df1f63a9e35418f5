//! # pwrep
//!
//! Reports expiring client secrets of directory applications and service
//! principals. See [`secret_expiry_reporter::cli`] for the commands.

use anyhow::{bail, Result};
use clap::Parser;
use secret_expiry_reporter::cli::{self, Cli};
use secret_expiry_reporter::config::ReporterConfig;
use secret_expiry_reporter::observability::init_logging;
use secret_expiry_reporter::ReportError;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Required for rustls 0.23+ when no default provider is selected by features
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        bail!("Failed to install rustls crypto provider");
    }

    let cli = Cli::parse();
    let config = ReporterConfig::from_env();
    init_logging(&config.log_level, cli.verbose)?;

    match cli::run(&cli, &config).await {
        Err(e)
            if e
                .downcast_ref::<ReportError>()
                .is_some_and(ReportError::is_usage_error) =>
        {
            eprintln!("Error: {e}");
            std::process::exit(2);
        }
        result => result,
    }
}
