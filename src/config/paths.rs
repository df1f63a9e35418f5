//! # Config Paths
//!
//! Locations of the credentials file and token cache, and private file I/O.

use crate::constants::{CREDENTIALS_FILE_NAME, TOKEN_CACHE_FILE_NAME};
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    dir: PathBuf,
}

impl ConfigPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn credentials_file(&self) -> PathBuf {
        self.dir.join(CREDENTIALS_FILE_NAME)
    }

    pub fn token_cache_file(&self) -> PathBuf {
        self.dir.join(TOKEN_CACHE_FILE_NAME)
    }

    /// Create the config directory (mode 0700) if it does not exist
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created.
    pub fn ensure_dir(&self) -> Result<()> {
        if self.dir.is_dir() {
            return Ok(());
        }
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder
            .create(&self.dir)
            .with_context(|| format!("Failed to create config directory {}", self.dir.display()))
    }

    /// Remove a file in the config directory; a missing file is not an error
    ///
    /// Returns whether a file was removed.
    ///
    /// # Errors
    /// Returns an error for any failure other than "not found".
    pub fn remove_file(path: &Path) -> Result<bool> {
        match fs::remove_file(path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

/// Write `contents` to `path`, readable by the owner only (mode 0600)
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(path)
        .with_context(|| format!("Failed to open {} for writing", path.display()))?;
    file.write_all(contents)
        .with_context(|| format!("Failed to write {}", path.display()))
}
