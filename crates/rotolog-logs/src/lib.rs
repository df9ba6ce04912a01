//! rotolog Logs - size-based log rotation with numbered backups
//!
//! The active file lives at the configured path; rotated content moves to
//! `<path>.1` (newest) through `<path>.N` (oldest).

mod capture;
mod rotation;
mod writer;

pub use capture::LogCapture;
pub use rotation::{BackupChain, RotationOutcome, RotationPolicy};
pub use writer::RotatingWriter;

pub use rotolog_core::{Error, Result, WriterConfig};
pub use rotolog_fs::{Filesystem, MockFilesystem, OsFilesystem};
