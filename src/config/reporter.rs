//! # Reporter Configuration
//!
//! Process-level settings loaded from environment variables.

use super::paths::ConfigPaths;
use crate::constants::*;
use std::path::PathBuf;
use std::time::Duration;

/// Reporter configuration
///
/// Built once at startup and handed, immutable, to the directory and auth
/// clients. The report pipeline itself takes no configuration beyond its
/// request.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Directory holding `credentials.yaml` and `accessTokens.json`
    pub config_dir: PathBuf,
    /// Identity provider authority (token and device code endpoints)
    pub authority_url: String,
    /// Microsoft Graph endpoint, without API version
    pub graph_endpoint: String,
    /// Per-request HTTP timeout (seconds)
    pub http_timeout_secs: u64,
    /// Retries for throttled or failing Graph requests
    pub max_retries: u32,
    /// First retry delay when Graph sends no `Retry-After` (milliseconds)
    pub backoff_start_ms: u64,
    /// Log level used when `RUST_LOG` is not set
    pub log_level: String,
    /// Disable terminal colors in text reports
    pub no_color: bool,
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            config_dir: default_config_dir(),
            authority_url: DEFAULT_AUTHORITY_URL.to_string(),
            graph_endpoint: DEFAULT_GRAPH_ENDPOINT.to_string(),
            http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_start_ms: DEFAULT_BACKOFF_START_MS,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            no_color: false,
        }
    }
}

impl ReporterConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self {
            config_dir: std::env::var_os("PWREP_CONFIG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_config_dir),
            authority_url: env_var_or_default_str("PWREP_AUTHORITY_URL", DEFAULT_AUTHORITY_URL),
            graph_endpoint: env_var_or_default_str("PWREP_GRAPH_ENDPOINT", DEFAULT_GRAPH_ENDPOINT),
            http_timeout_secs: env_var_or_default(
                "PWREP_HTTP_TIMEOUT_SECS",
                DEFAULT_HTTP_TIMEOUT_SECS,
            ),
            max_retries: env_var_or_default("PWREP_MAX_RETRIES", DEFAULT_MAX_RETRIES),
            backoff_start_ms: env_var_or_default("PWREP_BACKOFF_START_MS", DEFAULT_BACKOFF_START_MS),
            log_level: env_var_or_default_str("PWREP_LOG_LEVEL", DEFAULT_LOG_LEVEL),
            // https://no-color.org: any non-empty value disables color
            no_color: std::env::var("NO_COLOR").is_ok_and(|v| !v.is_empty()),
        }
    }

    /// Get HTTP request timeout duration
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    /// Get first retry delay duration
    pub fn backoff_start(&self) -> Duration {
        Duration::from_millis(self.backoff_start_ms)
    }

    /// File locations inside the config directory
    pub fn paths(&self) -> ConfigPaths {
        ConfigPaths::new(self.config_dir.clone())
    }

    /// OAuth2 token endpoint of a tenant
    pub fn token_url(&self, tenant_id: &str) -> String {
        format!(
            "{}/{tenant_id}/oauth2/v2.0/token",
            self.authority_url.trim_end_matches('/')
        )
    }

    /// OAuth2 device authorization endpoint of a tenant
    pub fn device_code_url(&self, tenant_id: &str) -> String {
        format!(
            "{}/{tenant_id}/oauth2/v2.0/devicecode",
            self.authority_url.trim_end_matches('/')
        )
    }

    /// Scope requesting every Graph permission granted to the caller
    pub fn graph_scope(&self) -> String {
        format!("{}/.default", self.graph_endpoint.trim_end_matches('/'))
    }
}

/// `$HOME/.maz`, or `.maz` in the working directory when `HOME` is unset
fn default_config_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(DEFAULT_CONFIG_DIR_NAME)
}

/// Read environment variable or return default value
fn env_var_or_default<T: std::str::FromStr>(key: &str, default: T) -> T
where
    <T as std::str::FromStr>::Err: std::fmt::Debug,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Read environment variable as string or return default
fn env_var_or_default_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ReporterConfig::default();
        assert_eq!(config.authority_url, "https://login.microsoftonline.com");
        assert_eq!(config.graph_endpoint, "https://graph.microsoft.com");
        assert_eq!(config.http_timeout(), Duration::from_secs(30));
        assert_eq!(config.max_retries, 3);
        assert!(config.config_dir.ends_with(".maz"));
        assert!(!config.no_color);
    }

    #[test]
    fn test_endpoint_urls() {
        let config = ReporterConfig {
            authority_url: "https://login.microsoftonline.us/".to_string(),
            graph_endpoint: "https://graph.microsoft.us/".to_string(),
            ..ReporterConfig::default()
        };
        assert_eq!(
            config.token_url("contoso.onmicrosoft.com"),
            "https://login.microsoftonline.us/contoso.onmicrosoft.com/oauth2/v2.0/token"
        );
        assert_eq!(
            config.device_code_url("t"),
            "https://login.microsoftonline.us/t/oauth2/v2.0/devicecode"
        );
        assert_eq!(config.graph_scope(), "https://graph.microsoft.us/.default");
    }

    #[test]
    fn test_env_var_or_default_ignores_unparseable() {
        assert_eq!(env_var_or_default("PWREP_TEST_UNSET_VARIABLE", 7u32), 7);
    }
}
