//! rotolog Filesystem - the narrow set of file operations the rotating writer needs
//!
//! - `OsFilesystem` forwards to `std::fs`
//! - `MockFilesystem` keeps files in memory and can fail any single operation

mod mock;
mod os;

pub use mock::{MockFile, MockFilesystem};
pub use os::OsFilesystem;

use std::fmt;
use std::io::{self, Write};
use std::path::Path;

/// Metadata returned by [`Filesystem::stat`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileInfo {
    pub len: u64,
}

/// Filesystem operation, used for fault injection and call recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsOp {
    Stat,
    Open,
    Write,
    Flush,
    Rename,
    Remove,
}

impl fmt::Display for FsOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FsOp::Stat => "stat",
            FsOp::Open => "open",
            FsOp::Write => "write",
            FsOp::Flush => "flush",
            FsOp::Rename => "rename",
            FsOp::Remove => "remove",
        };
        f.write_str(s)
    }
}

/// Trait for the filesystem capabilities used by the rotating writer
pub trait Filesystem: Send + Sync {
    /// Handle returned by `open_append`; writes go through `std::io::Write`
    type File: Write + Send;

    /// Inspect a path. Missing paths fail with `io::ErrorKind::NotFound`.
    fn stat(&self, path: &Path) -> io::Result<FileInfo>;

    /// Open a file for appending, creating it if it does not exist
    fn open_append(&self, path: &Path) -> io::Result<Self::File>;

    /// Rename a file, replacing the destination if present
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Remove a file
    fn remove(&self, path: &Path) -> io::Result<()>;

    /// Check whether a path exists; errors other than not-found are returned
    fn exists(&self, path: &Path) -> io::Result<bool> {
        match self.stat(path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

impl<T: Filesystem + ?Sized> Filesystem for std::sync::Arc<T> {
    type File = T::File;

    fn stat(&self, path: &Path) -> io::Result<FileInfo> {
        (**self).stat(path)
    }

    fn open_append(&self, path: &Path) -> io::Result<Self::File> {
        (**self).open_append(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        (**self).rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        (**self).remove(path)
    }
}
