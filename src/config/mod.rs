//! # Configuration
//!
//! - `reporter`: process settings from environment variables
//! - `login`: login values persisted in `credentials.yaml`
//! - `paths`: config directory layout and private file writes

pub mod login;
pub mod paths;
pub mod reporter;

pub use login::{ClientSecret, LoginConfig};
pub use paths::ConfigPaths;
pub use reporter::ReporterConfig;
