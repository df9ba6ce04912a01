//! Log rotation policy and backup retention

use rotolog_core::{Error, Result, RotationOp, WriterConfig};
use rotolog_fs::Filesystem;
use std::path::{Path, PathBuf};

/// Size threshold deciding whether a write must be preceded by rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    /// Maximum active file size in bytes (0 = never rotate)
    max_size_bytes: u64,
}

impl RotationPolicy {
    pub fn new(max_size_bytes: u64) -> Self {
        Self { max_size_bytes }
    }

    pub fn from_config(config: &WriterConfig) -> Self {
        Self::new(config.max_size_bytes())
    }

    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_bytes
    }

    pub fn is_enabled(&self) -> bool {
        self.max_size_bytes > 0
    }

    /// True when appending `pending` bytes to a file of `current_size` bytes
    /// would exceed the threshold. Empty writes never rotate.
    pub fn should_rotate(&self, current_size: u64, pending: usize) -> bool {
        self.is_enabled()
            && pending > 0
            && current_size.saturating_add(pending as u64) > self.max_size_bytes
    }
}

/// What a rotation did to the backup chain
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RotationOutcome {
    /// Backup removed because it fell outside the retention window
    pub purged: Option<PathBuf>,
    /// Number of backups renumbered to the next index
    pub shifted: usize,
    /// Active file moved to `<base>.1`
    pub archived: bool,
    /// Active file removed because no backups are kept
    pub discarded: bool,
}

/// Numbered backups of a log file: `<base>.1` (newest) to `<base>.N` (oldest)
#[derive(Debug, Clone)]
pub struct BackupChain {
    base: PathBuf,
    max_backups: usize,
}

impl BackupChain {
    pub fn new(base: impl Into<PathBuf>, max_backups: usize) -> Self {
        Self {
            base: base.into(),
            max_backups,
        }
    }

    pub fn base(&self) -> &Path {
        &self.base
    }

    pub fn max_backups(&self) -> usize {
        self.max_backups
    }

    /// Get the path for a rotated log file
    pub fn backup_path(&self, index: usize) -> PathBuf {
        let mut name = self.base.clone().into_os_string();
        name.push(format!(".{}", index));
        PathBuf::from(name)
    }

    /// Backups inside the retention window that exist, newest first
    pub fn existing<F: Filesystem>(&self, fs: &F) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        for index in 1..=self.max_backups {
            let path = self.backup_path(index);
            if exists(fs, &path)? {
                found.push(path);
            }
        }
        Ok(found)
    }

    /// Move the active file out of the way, keeping at most `max_backups`
    /// backups. The caller reopens the active file afterwards.
    ///
    /// Backups are renumbered from the first free slot down to `.1`, so a
    /// gap left by an earlier failed rotation is filled first. The oldest
    /// backup is purged only when every slot is taken.
    pub fn rotate<F: Filesystem>(&self, fs: &F) -> Result<RotationOutcome> {
        let mut outcome = RotationOutcome::default();

        if !exists(fs, &self.base)? {
            return Ok(outcome);
        }

        if self.max_backups == 0 {
            fs.remove(&self.base)
                .map_err(|e| Error::rotation(RotationOp::Remove, &self.base, e))?;
            outcome.discarded = true;
            return Ok(outcome);
        }

        let free = match self.first_free(fs)? {
            Some(index) => index,
            None => {
                let oldest = self.backup_path(self.max_backups);
                fs.remove(&oldest)
                    .map_err(|e| Error::rotation(RotationOp::Remove, &oldest, e))?;
                outcome.purged = Some(oldest);
                self.max_backups
            }
        };

        for index in (1..free).rev() {
            let from = self.backup_path(index);
            fs.rename(&from, &self.backup_path(index + 1))
                .map_err(|e| Error::rotation(RotationOp::Rename, &from, e))?;
            outcome.shifted += 1;
        }

        fs.rename(&self.base, &self.backup_path(1))
            .map_err(|e| Error::rotation(RotationOp::Rename, &self.base, e))?;
        outcome.archived = true;

        Ok(outcome)
    }

    /// Lowest backup index with no file, if any
    fn first_free<F: Filesystem>(&self, fs: &F) -> Result<Option<usize>> {
        for index in 1..=self.max_backups {
            if !exists(fs, &self.backup_path(index))? {
                return Ok(Some(index));
            }
        }
        Ok(None)
    }
}

fn exists<F: Filesystem>(fs: &F, path: &Path) -> Result<bool> {
    fs.exists(path)
        .map_err(|e| Error::rotation(RotationOp::Stat, path, e))
}
