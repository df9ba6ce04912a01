//! Constants and default values for rotolog

use std::path::PathBuf;

/// Default rotolog home directory name
pub const ROTOLOG_DIR: &str = ".rotolog";

/// Default config file names to search for (in priority order)
pub const CONFIG_FILES: &[&str] = &[
    "rotolog.toml",
    "rotolog.yaml",
    "rotolog.yml",
    "rotolog.json",
];

/// Bytes per mebibyte; `max_size` is configured in MiB
pub const BYTES_PER_MIB: u64 = 1024 * 1024;

/// Default maximum size of the active file, in MiB
pub const DEFAULT_MAX_SIZE_MB: i64 = 10;

/// Default number of rotated backups to keep
pub const DEFAULT_MAX_BACKUPS: i64 = 5;

/// Get the rotolog home directory
pub fn rotolog_home() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(ROTOLOG_DIR))
        .unwrap_or_else(|| PathBuf::from(ROTOLOG_DIR))
}

/// Get the default config file path (`~/.rotolog/rotolog.toml`)
pub fn default_config_path() -> PathBuf {
    rotolog_home().join(CONFIG_FILES[0])
}
