//! # Response Types
//!
//! Microsoft Graph payloads for application and service principal listings.
//!
//! Only the selected properties are modelled. References:
//! - https://learn.microsoft.com/graph/api/resources/application
//! - https://learn.microsoft.com/graph/api/resources/passwordcredential

use crate::report::types::{DirectoryObject, ObjectKind, SecretCredential};
use serde::Deserialize;

/// One page of an OData collection
#[derive(Debug, Deserialize)]
pub struct ODataPage<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    /// Absolute URL of the next page, absent on the last page
    #[serde(rename = "@odata.nextLink")]
    pub next_link: Option<String>,
}

/// Application or service principal, reduced to what the report needs
///
/// Graph may return `null` for any of these properties.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDirectoryEntry {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub password_credentials: Option<Vec<GraphPasswordCredential>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphPasswordCredential {
    #[serde(default)]
    pub key_id: Option<String>,
    #[serde(default)]
    pub end_date_time: Option<String>,
}

impl GraphDirectoryEntry {
    /// Convert into the report's typed record
    ///
    /// A missing `endDateTime` becomes an empty string so the report fails on
    /// it instead of silently dropping the secret.
    #[must_use]
    pub fn into_directory_object(self, object_kind: ObjectKind) -> DirectoryObject {
        DirectoryObject {
            display_name: self.display_name.unwrap_or_default(),
            app_id: self.app_id.unwrap_or_default(),
            object_kind,
            secrets: self
                .password_credentials
                .unwrap_or_default()
                .into_iter()
                .map(|pw| {
                    SecretCredential::new(
                        pw.key_id.unwrap_or_default(),
                        pw.end_date_time.unwrap_or_default(),
                    )
                })
                .collect(),
        }
    }
}

/// Graph error envelope
#[derive(Debug, Deserialize)]
pub struct GraphErrorResponse {
    pub error: GraphErrorBody,
}

#[derive(Debug, Deserialize)]
pub struct GraphErrorBody {
    pub code: String,
    #[serde(default)]
    pub message: String,
}
