//! # Login Configuration
//!
//! The identity used to call Graph, persisted as `credentials.yaml`:
//!
//! ```yaml
//! # automated (client credentials)
//! tenant_id: 3f2e...
//! client_id: 9a8b...
//! client_secret: "..."
//! interactive: false
//!
//! # interactive (device code)
//! tenant_id: 3f2e...
//! username: ops@contoso.com
//! interactive: true
//! ```

use super::paths::{write_private, ConfigPaths};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Client secret of an automated login; wiped on drop, never printed
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct ClientSecret(String);

impl ClientSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First and last two characters, for display
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 6 {
            return "*".repeat(chars.len());
        }
        let head: String = chars[..2].iter().collect();
        let tail: String = chars[chars.len() - 2..].iter().collect();
        format!("{head}{}{tail}", "*".repeat(chars.len() - 4))
    }
}

impl fmt::Debug for ClientSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClientSecret(***)")
    }
}

/// How the reporter authenticates against the directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginConfig {
    /// User signs in through the device code flow
    Interactive { tenant_id: String, username: String },
    /// Application signs in with a client secret
    Automated {
        tenant_id: String,
        client_id: String,
        client_secret: ClientSecret,
    },
}

/// On-disk layout of `credentials.yaml`
#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialsFile {
    tenant_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    client_secret: Option<ClientSecret>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(default)]
    interactive: bool,
}

impl LoginConfig {
    /// Validated interactive login
    ///
    /// # Errors
    /// Returns an error if the tenant is not a GUID or the username is not a UPN.
    pub fn interactive(tenant_id: &str, username: &str) -> Result<Self> {
        let tenant_id = validate_guid("tenant id", tenant_id)?;
        if !username.contains('@') {
            bail!("Username '{username}' is not a user principal name (expected user@domain)");
        }
        Ok(Self::Interactive {
            tenant_id,
            username: username.to_string(),
        })
    }

    /// Validated automated login
    ///
    /// # Errors
    /// Returns an error if an id is not a GUID or the secret is empty.
    pub fn automated(tenant_id: &str, client_id: &str, client_secret: &str) -> Result<Self> {
        let tenant_id = validate_guid("tenant id", tenant_id)?;
        let client_id = validate_guid("client id", client_id)?;
        if client_secret.is_empty() {
            bail!("Client secret must not be empty");
        }
        Ok(Self::Automated {
            tenant_id,
            client_id,
            client_secret: ClientSecret::new(client_secret),
        })
    }

    pub fn tenant_id(&self) -> &str {
        match self {
            Self::Interactive { tenant_id, .. } | Self::Automated { tenant_id, .. } => tenant_id,
        }
    }

    /// Load `credentials.yaml`; `Ok(None)` when no login is configured
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or is incomplete.
    pub fn load(paths: &ConfigPaths) -> Result<Option<Self>> {
        let path = paths.credentials_file();
        let contents = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()))
            }
        };
        let file: CredentialsFile = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Self::from_file(file)
            .map(Some)
            .with_context(|| format!("Incomplete login values in {}", path.display()))
    }

    /// Persist to `credentials.yaml` (mode 0600)
    ///
    /// # Errors
    /// Returns an error if the config directory or file cannot be written.
    pub fn save(&self, paths: &ConfigPaths) -> Result<()> {
        paths.ensure_dir()?;
        let yaml = serde_yaml::to_string(&self.to_file()).context("Failed to serialize login values")?;
        write_private(&paths.credentials_file(), yaml.as_bytes())
    }

    fn from_file(mut file: CredentialsFile) -> Result<Self> {
        if file.tenant_id.is_empty() {
            bail!("tenant_id is missing");
        }
        let tenant_id = std::mem::take(&mut file.tenant_id);
        if file.interactive {
            let username = file.username.take().context("username is missing")?;
            Ok(Self::Interactive { tenant_id, username })
        } else {
            let client_id = file.client_id.take().context("client_id is missing")?;
            let client_secret = file.client_secret.take().context("client_secret is missing")?;
            Ok(Self::Automated {
                tenant_id,
                client_id,
                client_secret,
            })
        }
    }

    fn to_file(&self) -> CredentialsFile {
        match self {
            Self::Interactive { tenant_id, username } => CredentialsFile {
                tenant_id: tenant_id.clone(),
                username: Some(username.clone()),
                interactive: true,
                ..CredentialsFile::default()
            },
            Self::Automated {
                tenant_id,
                client_id,
                client_secret,
            } => CredentialsFile {
                tenant_id: tenant_id.clone(),
                client_id: Some(client_id.clone()),
                client_secret: Some(client_secret.clone()),
                ..CredentialsFile::default()
            },
        }
    }
}

impl fmt::Display for LoginConfig {
    /// Multi-line summary with the secret masked
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Interactive { tenant_id, username } => {
                writeln!(f, "tenant_id: {tenant_id}")?;
                writeln!(f, "username: {username}")?;
                write!(f, "interactive: true")
            }
            Self::Automated {
                tenant_id,
                client_id,
                client_secret,
            } => {
                writeln!(f, "tenant_id: {tenant_id}")?;
                writeln!(f, "client_id: {client_id}")?;
                writeln!(f, "client_secret: {}", client_secret.masked())?;
                write!(f, "interactive: false")
            }
        }
    }
}

fn validate_guid(what: &str, value: &str) -> Result<String> {
    Uuid::parse_str(value)
        .map(|id| id.hyphenated().to_string())
        .with_context(|| format!("Invalid {what} '{value}': expected a GUID"))
}
