//! Writer configuration
//!
//! A `WriterConfig` can be built in code or loaded from a file in any of:
//! - TOML (.toml)
//! - YAML (.yaml, .yml)
//! - JSON (.json)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::*;
use crate::error::{ConfigError, Error, Result};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
    Json,
}

impl ConfigFormat {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "toml" => Some(ConfigFormat::Toml),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "json" => Some(ConfigFormat::Json),
            _ => None,
        }
    }

    /// Detect format from file path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }
}

/// Configuration of a rotating writer
///
/// Sizes are signed at this boundary so that negative values coming from
/// config files or flags are reported instead of wrapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Path of the active log file
    pub filename: PathBuf,
    /// Maximum size of the active file in MiB (0 = never rotate)
    #[serde(default = "default_max_size")]
    pub max_size: i64,
    /// Number of numbered backups to keep (0 = discard on rotation)
    #[serde(default = "default_max_backups")]
    pub max_backups: i64,
}

fn default_max_size() -> i64 {
    DEFAULT_MAX_SIZE_MB
}

fn default_max_backups() -> i64 {
    DEFAULT_MAX_BACKUPS
}

impl WriterConfig {
    pub fn new(filename: impl Into<PathBuf>, max_size: i64, max_backups: i64) -> Self {
        Self {
            filename: filename.into(),
            max_size,
            max_backups,
        }
    }

    /// Check the invariants the writer relies on for its whole lifetime
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.filename.as_os_str().is_empty() {
            return Err(ConfigError::EmptyFilename);
        }
        if self.max_size < 0 {
            return Err(ConfigError::NegativeMaxSize(self.max_size));
        }
        if self.max_backups < 0 {
            return Err(ConfigError::NegativeMaxBackups(self.max_backups));
        }
        Ok(())
    }

    /// Rotation threshold in bytes; 0 when rotation is disabled
    pub fn max_size_bytes(&self) -> u64 {
        u64::try_from(self.max_size)
            .unwrap_or(0)
            .saturating_mul(BYTES_PER_MIB)
    }

    /// Retention count as an index bound; 0 for negative input
    pub fn backup_count(&self) -> usize {
        usize::try_from(self.max_backups).unwrap_or(0)
    }

    /// Load config from file, automatically detecting format from extension
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ConfigNotFound(path.to_path_buf()));
        }

        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            Error::config(format!(
                "Unsupported config file extension: {}. Expected .toml, .yaml, .yml, or .json",
                path.display()
            ))
        })?;

        let content = std::fs::read_to_string(path)?;
        let config = Self::parse(&content, format)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse config content with specified format
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let config: Self = match format {
            ConfigFormat::Toml => toml::from_str(content)?,
            ConfigFormat::Yaml => serde_yaml::from_str(content)?,
            ConfigFormat::Json => serde_json::from_str(content)?,
        };
        Ok(config)
    }

    /// Find and load the first known config file in a directory
    pub fn find_and_load(dir: &Path) -> Result<(Self, PathBuf)> {
        for name in CONFIG_FILES {
            let path = dir.join(name);
            if path.exists() {
                let config = Self::load(&path)?;
                return Ok((config, path));
            }
        }
        Err(Error::config(format!(
            "No config file found in {}. Expected one of: {:?}",
            dir.display(),
            CONFIG_FILES
        )))
    }
}
