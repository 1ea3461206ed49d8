use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const DEFAULT_LOG_FILE: &str = "crlog.log";

/// Where and how a [`FileSink`](crate::FileSink) writes.
///
/// Usually loaded from a small TOML document:
///
/// ```toml
/// path = "/var/log/app/events.log"
/// create_parent_dirs = true
/// sync_each_line = false
/// ```
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogFileConfig {
    pub path: PathBuf,
    /// Create missing parent directories when opening the file.
    pub create_parent_dirs: bool,
    /// `fsync` file data after every appended line.
    pub sync_each_line: bool,
}

impl Default for LogFileConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_LOG_FILE),
            create_parent_dirs: true,
            sync_each_line: false,
        }
    }
}

impl LogFileConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        toml::from_str(input).map_err(|source| ConfigError::Parse { source })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }
}
