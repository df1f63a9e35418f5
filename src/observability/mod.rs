//! # Observability
//!
//! - `logging`: `tracing` subscriber setup for the CLI

pub mod logging;

pub use logging::init_logging;
