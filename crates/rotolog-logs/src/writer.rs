//! Log writer with size-based rotation

use parking_lot::Mutex;
use rotolog_core::{Error, Result, RotationOp, WriterConfig};
use rotolog_fs::{Filesystem, OsFilesystem};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::fmt::MakeWriter;

use crate::rotation::{BackupChain, RotationOutcome, RotationPolicy};

/// State guarded by the writer's lock
struct WriterState<W> {
    /// `None` after a failed reopen; the next write opens the active file
    file: Option<W>,
    current_size: u64,
    closed: bool,
}

/// Append-only log file that rotates itself once it grows past a size limit.
///
/// Every operation takes `&self` and is serialized by one lock, so the writer
/// can be shared between threads behind an `Arc`. Rotation runs inline in the
/// `write` call that crosses the threshold.
pub struct RotatingWriter<F: Filesystem = OsFilesystem> {
    fs: F,
    path: PathBuf,
    policy: RotationPolicy,
    chain: BackupChain,
    state: Mutex<WriterState<F::File>>,
}

impl RotatingWriter<OsFilesystem> {
    /// Create a writer on the real filesystem
    pub fn new(config: WriterConfig) -> Result<Self> {
        Self::with_filesystem(config, OsFilesystem)
    }
}

impl<F: Filesystem> RotatingWriter<F> {
    /// Create a writer on the given filesystem
    pub fn with_filesystem(config: WriterConfig, fs: F) -> Result<Self> {
        config.validate()?;

        let path = config.filename.clone();
        let current_size = match fs.stat(&path) {
            Ok(info) => info.len,
            Err(e) if e.kind() == ErrorKind::NotFound => 0,
            Err(e) => return Err(Error::stat(&path, e)),
        };

        let file = fs.open_append(&path).map_err(|e| Error::open(&path, e))?;

        debug!(
            "Opened log file {} ({} bytes, max {} MiB, {} backups)",
            path.display(),
            current_size,
            config.max_size,
            config.max_backups
        );

        Ok(Self {
            policy: RotationPolicy::from_config(&config),
            chain: BackupChain::new(&path, config.backup_count()),
            fs,
            path,
            state: Mutex::new(WriterState {
                file: Some(file),
                current_size,
                closed: false,
            }),
        })
    }

    /// Append `data` to the active file, rotating first if it would not fit.
    ///
    /// Returns the number of bytes the file accepted.
    pub fn write(&self, data: &[u8]) -> Result<usize> {
        let mut rotated = None;
        let result = {
            let mut guard = self.state.lock();
            self.write_locked(&mut guard, data, &mut rotated)
        };

        // Diagnostics are emitted after the lock is released so this writer
        // can itself be the destination of the tracing subscriber.
        if let Some(outcome) = rotated {
            self.log_rotation(&outcome);
        }
        if let Err(Error::Rotation { op, path, source }) = &result {
            warn!(
                "Log rotation of {} failed at {} {}: {}",
                self.path.display(),
                op,
                path.display(),
                source
            );
        }

        result
    }

    fn write_locked(
        &self,
        state: &mut WriterState<F::File>,
        data: &[u8],
        rotated: &mut Option<RotationOutcome>,
    ) -> Result<usize> {
        if state.closed {
            return Err(Error::Closed);
        }

        if self.policy.should_rotate(state.current_size, data.len()) {
            *rotated = Some(self.rotate(state)?);
        }

        let file = match state.file.take() {
            Some(file) => file,
            None => self
                .fs
                .open_append(&self.path)
                .map_err(|e| Error::open(&self.path, e))?,
        };
        let file = state.file.insert(file);

        let written = loop {
            match file.write(data) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::write(&self.path, e)),
            }
        };

        state.current_size += written as u64;
        Ok(written)
    }

    /// Rotate the log file. On failure the current handle and size are kept,
    /// so the next write tries again.
    fn rotate(&self, state: &mut WriterState<F::File>) -> Result<RotationOutcome> {
        if let Some(file) = state.file.as_mut() {
            file.flush()
                .map_err(|e| Error::rotation(RotationOp::Flush, &self.path, e))?;
        }

        let outcome = self.chain.rotate(&self.fs)?;

        // The old handle now points at a backup (or an unlinked file)
        match self.fs.open_append(&self.path) {
            Ok(file) => {
                state.file = Some(file);
                state.current_size = 0;
                Ok(outcome)
            }
            Err(e) => {
                state.file = None;
                state.current_size = 0;
                Err(Error::rotation(RotationOp::Reopen, &self.path, e))
            }
        }
    }

    fn log_rotation(&self, outcome: &RotationOutcome) {
        if let Some(purged) = &outcome.purged {
            debug!("Purged backup outside retention window: {}", purged.display());
        }
        if outcome.discarded {
            info!("Rotated log file {} (previous content discarded)", self.path.display());
        } else {
            info!(
                "Rotated log file {} ({} backups renumbered)",
                self.path.display(),
                outcome.shifted
            );
        }
    }

    /// Flush the active file handle
    pub fn flush(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(Error::Closed);
        }
        match state.file.as_mut() {
            Some(file) => file.flush().map_err(|e| Error::write(&self.path, e)),
            None => Ok(()),
        }
    }

    /// Flush and release the active file. Calling it again is a no-op.
    ///
    /// The writer counts as closed even when the final flush fails.
    pub fn close(&self) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Ok(());
        }
        state.closed = true;

        match state.file.take() {
            Some(mut file) => file.flush().map_err(|e| Error::write(&self.path, e)),
            None => Ok(()),
        }
    }

    /// Get the log file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes written to the active file since it was opened or rotated
    pub fn current_size(&self) -> u64 {
        self.state.lock().current_size
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.policy.max_size_bytes()
    }

    pub fn max_backups(&self) -> usize {
        self.chain.max_backups()
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Get the path of the backup with the given index
    pub fn backup_path(&self, index: usize) -> PathBuf {
        self.chain.backup_path(index)
    }

    /// Backups currently on disk, newest first
    pub fn backups(&self) -> Result<Vec<PathBuf>> {
        self.chain.existing(&self.fs)
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }
}

impl<F: Filesystem> Drop for RotatingWriter<F> {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if state.closed {
            return;
        }
        if let Some(file) = state.file.as_mut() {
            if let Err(e) = file.flush() {
                warn!("Failed to flush {} on drop: {}", self.path.display(), e);
            }
        }
    }
}

impl<F: Filesystem> Write for RotatingWriter<F> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RotatingWriter::write(self, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> io::Result<()> {
        RotatingWriter::flush(self).map_err(Into::into)
    }
}

impl<F: Filesystem> Write for &RotatingWriter<F> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        RotatingWriter::write(*self, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> io::Result<()> {
        RotatingWriter::flush(*self).map_err(Into::into)
    }
}

impl<'a, F: Filesystem + 'a> MakeWriter<'a> for RotatingWriter<F> {
    type Writer = &'a RotatingWriter<F>;

    fn make_writer(&'a self) -> Self::Writer {
        self
    }
}
