//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use rotolog_core::constants::{DEFAULT_MAX_BACKUPS, DEFAULT_MAX_SIZE_MB};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "rotolog")]
#[command(version, about = "Write output into size-rotated log files")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Copy stdin into a rotating log file until EOF
    Pipe(PipeArgs),

    /// Validate a writer configuration and show the effective settings
    Check(CheckArgs),
}

/// Where to write and when to rotate
#[derive(Args, Debug, Clone)]
pub struct TargetArgs {
    /// Config file (.toml, .yaml, .yml or .json); takes precedence over --file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Active log file path
    #[arg(short, long, env = "ROTOLOG_FILE")]
    pub file: Option<PathBuf>,

    /// Rotate once the active file would exceed this many MiB (0 = never)
    #[arg(
        long,
        env = "ROTOLOG_MAX_SIZE",
        default_value_t = DEFAULT_MAX_SIZE_MB,
        allow_negative_numbers = true
    )]
    pub max_size: i64,

    /// Number of numbered backups to keep (0 = discard on rotation)
    #[arg(
        long,
        env = "ROTOLOG_MAX_BACKUPS",
        default_value_t = DEFAULT_MAX_BACKUPS,
        allow_negative_numbers = true
    )]
    pub max_backups: i64,
}

#[derive(Args)]
pub struct PipeArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Prefix each line with a UTC timestamp
    #[arg(short, long)]
    pub timestamps: bool,

    /// Also echo each line to stdout
    #[arg(long)]
    pub tee: bool,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
