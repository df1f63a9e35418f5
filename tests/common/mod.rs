//! Common test utilities
//!
//! Rustls provider setup for the Pact tests and directory fixtures for the
//! report scenarios.

#![allow(dead_code, reason = "each test crate uses a subset of the helpers")]

use secret_expiry_reporter::report::{DirectoryObject, ObjectKind, SecretCredential};
use std::sync::Once;

static RUSTLS_INIT: Once = Once::new();

/// Initialize rustls crypto provider for tests
///
/// Must run before any reqwest client is built. Uses a `Once` so every test
/// in a crate can call it.
pub fn init_rustls() {
    RUSTLS_INIT.call_once(|| {
        rustls::crypto::ring::default_provider()
            .install_default()
            .expect("Failed to install rustls crypto provider");
    });
}

/// Fixed "current time" of the scenarios: 2023-11-14 22:13:20 UTC
pub const NOW: i64 = 1_700_000_000;

pub const TENANT_ID: &str = "3f2e1d0c-9b8a-4765-a432-10fedcba9876";
pub const CLIENT_ID: &str = "9a8b7c6d-5e4f-4321-8765-43210fedcba9";

/// RFC 3339 timestamp `days` after [`NOW`] (negative for the past)
pub fn days_from_now(days: i64) -> String {
    chrono::DateTime::from_timestamp(NOW + days * 86_400, 0)
        .expect("timestamp in range")
        .to_rfc3339()
}

/// Directory object with `(secret_id, end_date_time)` secrets
pub fn object(
    kind: ObjectKind,
    display_name: &str,
    app_id: &str,
    secrets: &[(&str, &str)],
) -> DirectoryObject {
    DirectoryObject {
        display_name: display_name.to_string(),
        app_id: app_id.to_string(),
        object_kind: kind,
        secrets: secrets
            .iter()
            .map(|(id, end)| SecretCredential::new(*id, *end))
            .collect(),
    }
}

pub fn app(display_name: &str, app_id: &str, secrets: &[(&str, &str)]) -> DirectoryObject {
    object(ObjectKind::App, display_name, app_id, secrets)
}

pub fn sp(display_name: &str, app_id: &str, secrets: &[(&str, &str)]) -> DirectoryObject {
    object(ObjectKind::ServicePrincipal, display_name, app_id, secrets)
}

/// Strip the Pact mock server URL's trailing slash
pub fn base_url(url: impl std::fmt::Display) -> String {
    let mut base = url.to_string();
    if base.ends_with('/') {
        base.pop();
    }
    base
}
