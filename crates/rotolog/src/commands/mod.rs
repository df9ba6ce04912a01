//! Command implementations

pub mod check;
pub mod pipe;

use anyhow::{bail, Result};
use rotolog_core::constants::{default_config_path, CONFIG_FILES};
use rotolog_core::WriterConfig;
use std::path::Path;
use tracing::debug;

use crate::cli::TargetArgs;

/// Resolve the writer config: `--config`, then `--file` flags, then a config
/// file in the current directory, then `~/.rotolog/rotolog.toml`
pub fn resolve_config(target: &TargetArgs) -> Result<WriterConfig> {
    if let Some(path) = &target.config {
        return Ok(WriterConfig::load(path)?);
    }

    if let Some(file) = &target.file {
        let config = WriterConfig::new(file, target.max_size, target.max_backups);
        config.validate()?;
        return Ok(config);
    }

    let cwd = std::env::current_dir()?;
    if has_config_file(&cwd) {
        let (config, path) = WriterConfig::find_and_load(&cwd)?;
        debug!("Using config file {}", path.display());
        return Ok(config);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        return Ok(WriterConfig::load(&default_path)?);
    }

    bail!("No log file configured: pass --file or --config")
}

fn has_config_file(dir: &Path) -> bool {
    CONFIG_FILES.iter().any(|name| dir.join(name).exists())
}
