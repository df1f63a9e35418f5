//! # Types
//!
//! Value types flowing through the report pipeline.

use std::fmt;

/// Kind of directory object a secret is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    /// Application registration
    App,
    /// Service principal (enterprise application)
    ServicePrincipal,
}

impl ObjectKind {
    /// Label printed in the `OBJ` column
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::App => "App",
            ObjectKind::ServicePrincipal => "SP",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One password credential attached to a directory object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretCredential {
    /// Opaque key identifier (`keyId`)
    pub secret_id: String,
    /// Expiry exactly as the provider emitted it (`endDateTime`)
    pub expiry_raw: String,
}

impl SecretCredential {
    pub fn new(secret_id: impl Into<String>, expiry_raw: impl Into<String>) -> Self {
        Self {
            secret_id: secret_id.into(),
            expiry_raw: expiry_raw.into(),
        }
    }
}

/// One application or service principal record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryObject {
    pub display_name: String,
    /// Stable client identifier
    pub app_id: String,
    pub object_kind: ObjectKind,
    /// Password credentials in provider order, possibly empty
    pub secrets: Vec<SecretCredential>,
}

/// Which directory objects a report covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    Apps,
    ServicePrincipals,
    /// Applications first, then service principals
    Combined,
}

impl ReportMode {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportMode::Apps => "apps",
            ReportMode::ServicePrincipals => "service-principals",
            ReportMode::Combined => "combined",
        }
    }
}

/// Output encoding of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Aligned columns, expired expiry dates highlighted
    Text,
    /// Every field double-quoted, comma separated
    Csv,
}

/// The rendering unit: one included secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub object_kind: ObjectKind,
    pub display_name: String,
    pub app_id: String,
    pub secret_id: String,
    pub expiry_display: String,
    pub is_expired: bool,
}
