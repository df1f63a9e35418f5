//! # Secret Expiry Reporter
//!
//! Reports the client secrets (password credentials) of directory
//! applications and service principals, flagging those that expired or
//! expire within a window of days.
//!
//! - `report`: the pure reporting pipeline (normalize, classify, extract, merge, render)
//! - `directory`: directory client contract and the Microsoft Graph client
//! - `auth`: OAuth2 token acquisition and caching
//! - `config`: environment settings and persisted login values
//! - `cli`: the `pwrep` command line
//! - `observability`: logging setup

pub mod auth;
pub mod cli;
pub mod config;
pub mod constants;
pub mod directory;
pub mod observability;
pub mod report;

pub use directory::{DirectoryClient, GraphDirectoryClient, StaticDirectory};
pub use report::{produce_report, ReportError, ReportRequest};
