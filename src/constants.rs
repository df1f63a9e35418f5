//! # Constants
//!
//! Shared constants used throughout the reporter.
//!
//! These values represent reasonable defaults and can be overridden via
//! environment variables where applicable (see [`crate::config::ReporterConfig`]).

/// Window value meaning "report every secret, regardless of expiry"
pub const NO_FILTER_WINDOW: i64 = -1;

/// Seconds in one day, used for window arithmetic
pub const SECONDS_PER_DAY: i64 = 86_400;

/// Display format for expiry timestamps (`YYYY-MM-DD HH:MM`)
pub const EXPIRY_DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Column widths of the text report (the last column is unbounded)
pub const OBJ_COLUMN_WIDTH: usize = 6;
pub const DISPLAY_NAME_COLUMN_WIDTH: usize = 40;
pub const APP_ID_COLUMN_WIDTH: usize = 38;
pub const SECRET_ID_COLUMN_WIDTH: usize = 38;

/// Report header, in column order
pub const REPORT_HEADER: [&str; 5] = [
    "OBJ",
    "DISPLAY_NAME",
    "APP_ID",
    "SECRET_ID",
    "EXPIRY_DATE_TIME",
];

/// Configuration directory created under `$HOME` when no override is given
pub const DEFAULT_CONFIG_DIR_NAME: &str = ".maz";

/// File holding the configured login values
pub const CREDENTIALS_FILE_NAME: &str = "credentials.yaml";

/// File holding the cached access token
pub const TOKEN_CACHE_FILE_NAME: &str = "accessTokens.json";

/// Default identity provider authority
pub const DEFAULT_AUTHORITY_URL: &str = "https://login.microsoftonline.com";

/// Default Microsoft Graph endpoint
pub const DEFAULT_GRAPH_ENDPOINT: &str = "https://graph.microsoft.com";

/// Microsoft Graph API version used for directory reads
pub const GRAPH_API_VERSION: &str = "v1.0";

/// Page size requested from Graph list endpoints (the service maximum)
pub const GRAPH_PAGE_SIZE: u32 = 999;

/// Public client id used for interactive (device code) logins
pub const INTERACTIVE_CLIENT_ID: &str = "04b07795-8ddb-461a-bbee-02f9e1bf7b46";

/// Default HTTP request timeout (seconds)
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Default number of retries for throttled or failing Graph requests
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Initial backoff between Graph retries when no `Retry-After` is given (milliseconds)
pub const DEFAULT_BACKOFF_START_MS: u64 = 1000;

/// A cached token is refreshed this long before it actually expires (seconds)
pub const TOKEN_EXPIRY_GRACE_SECS: i64 = 300;

/// Default log level when neither `RUST_LOG` nor `PWREP_LOG_LEVEL` is set
pub const DEFAULT_LOG_LEVEL: &str = "warn";
