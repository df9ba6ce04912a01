//! Check command implementation - validates a writer configuration

use anyhow::Result;
use rotolog_core::WriterConfig;
use rotolog_logs::BackupChain;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::CheckArgs;
use crate::output::{print_field, print_success};

/// Effective settings of a validated configuration
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub filename: PathBuf,
    pub max_size_mb: i64,
    pub max_size_bytes: u64,
    pub rotation_enabled: bool,
    pub max_backups: i64,
    pub backup_paths: Vec<PathBuf>,
}

impl From<&WriterConfig> for CheckReport {
    fn from(config: &WriterConfig) -> Self {
        let chain = BackupChain::new(&config.filename, config.backup_count());
        CheckReport {
            filename: config.filename.clone(),
            max_size_mb: config.max_size,
            max_size_bytes: config.max_size_bytes(),
            rotation_enabled: config.max_size > 0,
            max_backups: config.max_backups,
            backup_paths: (1..=chain.max_backups())
                .map(|index| chain.backup_path(index))
                .collect(),
        }
    }
}

pub fn execute(args: CheckArgs) -> Result<()> {
    let config = super::resolve_config(&args.target)?;
    let report = CheckReport::from(&config);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_success("Configuration is valid");
    print_field("file", &report.filename.display().to_string());
    if report.rotation_enabled {
        print_field(
            "max size",
            &format!("{} MiB ({} bytes)", report.max_size_mb, report.max_size_bytes),
        );
    } else {
        print_field("max size", "unlimited (rotation disabled)");
    }
    match report.backup_paths.as_slice() {
        [] => print_field("backups", "none (discarded on rotation)"),
        [only] => print_field("backups", &only.display().to_string()),
        [first, .., last] => print_field(
            "backups",
            &format!("{} ... {}", first.display(), last.display()),
        ),
    }

    Ok(())
}
