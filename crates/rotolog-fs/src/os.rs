//! Real filesystem backed by `std::fs`

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;

use crate::{FileInfo, Filesystem};

/// Real filesystem implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFilesystem;

impl Filesystem for OsFilesystem {
    type File = File;

    fn stat(&self, path: &Path) -> io::Result<FileInfo> {
        let metadata = fs::metadata(path)?;
        Ok(FileInfo {
            len: metadata.len(),
        })
    }

    fn open_append(&self, path: &Path) -> io::Result<File> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        OpenOptions::new().create(true).append(true).open(path)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_stat_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = OsFilesystem.stat(&dir.path().join("missing.log")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        assert!(!OsFilesystem.exists(&dir.path().join("missing.log")).unwrap());
    }

    #[test]
    fn test_open_append_creates_and_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("app.log");

        {
            let mut file = OsFilesystem.open_append(&path).unwrap();
            file.write_all(b"one ").unwrap();
        }
        {
            let mut file = OsFilesystem.open_append(&path).unwrap();
            file.write_all(b"two").unwrap();
        }

        assert_eq!(fs::read_to_string(&path).unwrap(), "one two");
        assert_eq!(OsFilesystem.stat(&path).unwrap().len, 7);
    }

    #[test]
    fn test_rename_and_remove() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.log");
        let b = dir.path().join("b.log");
        fs::write(&a, "data").unwrap();

        OsFilesystem.rename(&a, &b).unwrap();
        assert!(!a.exists());
        assert_eq!(fs::read_to_string(&b).unwrap(), "data");

        OsFilesystem.remove(&b).unwrap();
        assert!(!b.exists());
        assert_eq!(
            OsFilesystem.remove(&b).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
    }
}
