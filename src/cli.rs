//! # pwrep CLI
//!
//! Command-line interface for the secret expiry reporter.
//!
//! ## Usage
//!
//! ```bash
//! # Configure an interactive (device code) login
//! pwrep id 3f2e1d0c-9b8a-4765-a432-10fedcba9876 admin@contoso.com
//!
//! # Configure an automated (client secret) login
//! pwrep id 3f2e1d0c-9b8a-4765-a432-10fedcba9876 9a8b7c6d-5e4f-4321-8765-43210fedcba9 'secret'
//!
//! # Application secrets expiring within 30 days
//! pwrep ap 30
//!
//! # Every application and service principal secret, as CSV
//! pwrep csv > secrets.csv
//!
//! # Forget the login and cached tokens
//! pwrep tx
//! ```

use crate::auth::{CachingTokenProvider, TokenCache};
use crate::config::{LoginConfig, ReporterConfig};
use crate::constants::NO_FILTER_WINDOW;
use crate::directory::GraphDirectoryClient;
use crate::report::{produce_report, Encoding, ReportMode, ReportRequest, Window};
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::sync::Arc;
use tracing::{debug, info};

/// Package version with the git hash of the build
pub const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BUILD_GIT_HASH"),
    ")"
);

/// [`VERSION`] plus the build time
pub const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BUILD_GIT_HASH"),
    ", built ",
    env!("BUILD_DATETIME"),
    ")"
);

/// Report password credentials of directory applications and service principals
#[derive(Debug, Parser)]
#[command(name = "pwrep")]
#[command(
    version = VERSION,
    long_version = LONG_VERSION,
    about = "Report expiring client secrets of applications and service principals",
    long_about = None,
    after_help = "\
DAYS is the look-ahead window; -1 (the default) lists every secret.

Examples:
  pwrep ap 30
  pwrep sp 90 --csv
  pwrep all
  pwrep id TENANT_ID admin@contoso.com
"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Do not color expired secrets
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Application secrets
    Ap {
        /// Window in days (-1 = all)
        #[arg(allow_negative_numbers = true, default_value_t = NO_FILTER_WINDOW)]
        days: i64,
        /// Write CSV instead of a table
        #[arg(long)]
        csv: bool,
    },
    /// Service principal secrets
    Sp {
        /// Window in days (-1 = all)
        #[arg(allow_negative_numbers = true, default_value_t = NO_FILTER_WINDOW)]
        days: i64,
        /// Write CSV instead of a table
        #[arg(long)]
        csv: bool,
    },
    /// Application and service principal secrets, as CSV
    Csv {
        /// Window in days (-1 = all)
        #[arg(allow_negative_numbers = true, default_value_t = NO_FILTER_WINDOW)]
        days: i64,
    },
    /// Application and service principal secrets, as a table
    All {
        /// Window in days (-1 = all)
        #[arg(allow_negative_numbers = true, default_value_t = NO_FILTER_WINDOW)]
        days: i64,
    },
    /// Show or set the login: `id`, `id TENANT USERNAME`, `id TENANT CLIENT_ID SECRET`
    Id {
        #[arg(num_args = 0..=3, value_name = "VALUE")]
        values: Vec<String>,
    },
    /// Delete the stored login and cached tokens
    Tx,
}

impl Cli {
    /// Report options for report commands, `None` for `id`/`tx`
    pub fn report_request(&self, config: &ReporterConfig) -> Option<ReportRequest> {
        let (mode, window_days, encoding) = match self.command {
            Commands::Ap { days, csv } => (ReportMode::Apps, days, encoding(csv)),
            Commands::Sp { days, csv } => (ReportMode::ServicePrincipals, days, encoding(csv)),
            Commands::Csv { days } => (ReportMode::Combined, days, Encoding::Csv),
            Commands::All { days } => (ReportMode::Combined, days, Encoding::Text),
            Commands::Id { .. } | Commands::Tx => return None,
        };
        Some(ReportRequest {
            mode,
            window_days,
            encoding,
            highlight: !(self.no_color || config.no_color),
        })
    }
}

fn encoding(csv: bool) -> Encoding {
    if csv {
        Encoding::Csv
    } else {
        Encoding::Text
    }
}

/// Execute the parsed command
///
/// # Errors
/// Returns the first failure; report errors are [`crate::report::ReportError`]s
/// wrapped in `anyhow`.
pub async fn run(cli: &Cli, config: &ReporterConfig) -> Result<()> {
    if let Some(request) = cli.report_request(config) {
        return report(config, request).await;
    }
    match &cli.command {
        Commands::Id { values } => id(config, values),
        Commands::Tx => tx(config),
        _ => Ok(()),
    }
}

async fn report(config: &ReporterConfig, request: ReportRequest) -> Result<()> {
    // Reject a bad window before asking for a login
    Window::from_days(request.window_days)?;

    let paths = config.paths();
    let login = LoginConfig::load(&paths)?.with_context(|| {
        format!(
            "No login configured in {}; run `pwrep id TENANT_ID USERNAME` or `pwrep id TENANT_ID CLIENT_ID SECRET`",
            paths.dir().display()
        )
    })?;
    debug!(tenant_id = login.tenant_id(), "loaded login values");

    let provider = CachingTokenProvider::new(config.clone(), login)
        .context("Failed to create token provider")?;
    let client = GraphDirectoryClient::new(config, Arc::new(provider))
        .context("Failed to create Graph client")?;

    let now = chrono::Utc::now().timestamp();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let rows = produce_report(&client, request, now, &mut out).await?;
    out.flush().context("Failed to flush report")?;

    info!(rows, "report written");
    Ok(())
}

fn id(config: &ReporterConfig, values: &[String]) -> Result<()> {
    let paths = config.paths();
    let login = match values {
        [] => {
            println!("config_dir: {}", paths.dir().display());
            println!("credentials_file: {}", paths.credentials_file().display());
            println!("token_cache: {}", paths.token_cache_file().display());
            match LoginConfig::load(&paths)? {
                Some(login) => println!("{login}"),
                None => println!("(no login configured)"),
            }
            return Ok(());
        }
        [tenant_id, username] => LoginConfig::interactive(tenant_id, username)?,
        [tenant_id, client_id, secret] => LoginConfig::automated(tenant_id, client_id, secret)?,
        _ => bail!("Expected `id TENANT_ID USERNAME` or `id TENANT_ID CLIENT_ID SECRET`"),
    };

    login.save(&paths)?;
    // Tokens of a previous login are useless now
    TokenCache::new(&paths).remove()?;
    println!("Login saved to {}", paths.credentials_file().display());
    println!("{login}");
    Ok(())
}

fn tx(config: &ReporterConfig) -> Result<()> {
    let paths = config.paths();
    for path in [paths.token_cache_file(), paths.credentials_file()] {
        if crate::config::ConfigPaths::remove_file(&path)? {
            println!("Removed {}", path.display());
        }
    }
    Ok(())
}
