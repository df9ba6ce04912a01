//! In-memory filesystem for testing
//!
//! Open handles keep pointing at the same content across renames and
//! removals, like file descriptors on Unix. Any operation can be made to fail.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::{FileInfo, Filesystem, FsOp};

type Content = Arc<Mutex<Vec<u8>>>;

#[derive(Debug, Clone)]
struct Fault {
    op: FsOp,
    path: Option<PathBuf>,
    /// `None` fails forever
    remaining: Option<usize>,
    kind: io::ErrorKind,
}

impl Fault {
    fn matches(&self, op: FsOp, path: &Path) -> bool {
        self.op == op && self.path.as_deref().map_or(true, |p| p == path)
    }
}

#[derive(Debug, Default)]
struct MockState {
    files: HashMap<PathBuf, Content>,
    faults: Vec<Fault>,
    calls: Vec<(FsOp, PathBuf)>,
    short_write: Option<usize>,
}

impl MockState {
    /// Record the call and fail it if a matching fault is armed
    fn enter(&mut self, op: FsOp, path: &Path) -> io::Result<()> {
        self.calls.push((op, path.to_path_buf()));

        let Some(idx) = self.faults.iter().position(|f| f.matches(op, path)) else {
            return Ok(());
        };

        let kind = self.faults[idx].kind;
        match self.faults[idx].remaining {
            Some(n) if n <= 1 => {
                self.faults.remove(idx);
            }
            Some(n) => self.faults[idx].remaining = Some(n - 1),
            None => {}
        }

        Err(io::Error::new(
            kind,
            format!("injected {} failure: {}", op, path.display()),
        ))
    }
}

/// Mock filesystem for testing.
/// Cloning creates a new handle to the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct MockFilesystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file directly (for test setup)
    pub fn add_file(&self, path: impl Into<PathBuf>, data: impl Into<Vec<u8>>) {
        self.state
            .lock()
            .files
            .insert(path.into(), Arc::new(Mutex::new(data.into())));
    }

    /// Get content of a specific file
    pub fn get_file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        let state = self.state.lock();
        let content = state.files.get(path.as_ref())?;
        let data = content.lock().clone();
        Some(data)
    }

    /// Get content of a file as UTF-8 (lossy)
    pub fn read_to_string(&self, path: impl AsRef<Path>) -> Option<String> {
        self.get_file(path)
            .map(|data| String::from_utf8_lossy(&data).into_owned())
    }

    /// Check presence without recording a call or triggering faults
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        self.state.lock().files.contains_key(path.as_ref())
    }

    /// All file paths, sorted
    pub fn paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self.state.lock().files.keys().cloned().collect();
        paths.sort();
        paths
    }

    /// Make every call of `op` fail
    pub fn fail(&self, op: FsOp) {
        self.push_fault(op, None, None, io::ErrorKind::Other);
    }

    /// Make the next call of `op` fail
    pub fn fail_once(&self, op: FsOp) {
        self.push_fault(op, None, Some(1), io::ErrorKind::Other);
    }

    /// Make every call of `op` on `path` fail
    pub fn fail_path(&self, op: FsOp, path: impl Into<PathBuf>) {
        self.push_fault(op, Some(path.into()), None, io::ErrorKind::Other);
    }

    /// Make every call of `op` fail with a specific error kind
    pub fn fail_with_kind(&self, op: FsOp, kind: io::ErrorKind) {
        self.push_fault(op, None, None, kind);
    }

    pub fn clear_faults(&self) {
        self.state.lock().faults.clear();
    }

    /// Cap the number of bytes accepted by each write call
    pub fn set_short_writes(&self, max: Option<usize>) {
        self.state.lock().short_write = max;
    }

    /// All recorded calls in order
    pub fn calls(&self) -> Vec<(FsOp, PathBuf)> {
        self.state.lock().calls.clone()
    }

    /// Number of recorded calls of `op`
    pub fn call_count(&self, op: FsOp) -> usize {
        self.state.lock().calls.iter().filter(|(o, _)| *o == op).count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().calls.clear();
    }

    fn push_fault(&self, op: FsOp, path: Option<PathBuf>, remaining: Option<usize>, kind: io::ErrorKind) {
        self.state.lock().faults.push(Fault {
            op,
            path,
            remaining,
            kind,
        });
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("file not found: {}", path.display()),
    )
}

impl Filesystem for MockFilesystem {
    type File = MockFile;

    fn stat(&self, path: &Path) -> io::Result<FileInfo> {
        let mut state = self.state.lock();
        state.enter(FsOp::Stat, path)?;
        let content = state.files.get(path).ok_or_else(|| not_found(path))?;
        let len = content.lock().len() as u64;
        Ok(FileInfo { len })
    }

    fn open_append(&self, path: &Path) -> io::Result<MockFile> {
        let mut state = self.state.lock();
        state.enter(FsOp::Open, path)?;
        let content = state.files.entry(path.to_path_buf()).or_default().clone();
        Ok(MockFile {
            path: path.to_path_buf(),
            content,
            state: self.state.clone(),
        })
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut state = self.state.lock();
        state.enter(FsOp::Rename, from)?;
        let content = state.files.remove(from).ok_or_else(|| not_found(from))?;
        state.files.insert(to.to_path_buf(), content);
        Ok(())
    }

    fn remove(&self, path: &Path) -> io::Result<()> {
        let mut state = self.state.lock();
        state.enter(FsOp::Remove, path)?;
        state.files.remove(path).ok_or_else(|| not_found(path))?;
        Ok(())
    }
}

/// Handle returned by [`MockFilesystem::open_append`]
#[derive(Debug)]
pub struct MockFile {
    /// Path at open time, used for fault matching
    path: PathBuf,
    content: Content,
    state: Arc<Mutex<MockState>>,
}

impl Write for MockFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let limit = {
            let mut state = self.state.lock();
            state.enter(FsOp::Write, &self.path)?;
            state.short_write
        };
        let n = limit.map_or(buf.len(), |max| buf.len().min(max));
        self.content.lock().extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.state.lock().enter(FsOp::Flush, &self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_stat() {
        let fs = MockFilesystem::new();
        fs.add_file("/logs/app.log", "hello");

        assert_eq!(fs.stat(Path::new("/logs/app.log")).unwrap().len, 5);
        assert_eq!(
            fs.stat(Path::new("/logs/other.log")).unwrap_err().kind(),
            io::ErrorKind::NotFound
        );
        assert!(fs.exists(Path::new("/logs/app.log")).unwrap());
    }

    #[test]
    fn test_handle_follows_rename() {
        let fs = MockFilesystem::new();
        let active = Path::new("/logs/app.log");
        let backup = Path::new("/logs/app.log.1");

        let mut file = fs.open_append(active).unwrap();
        file.write_all(b"before ").unwrap();
        fs.rename(active, backup).unwrap();
        file.write_all(b"after").unwrap();

        assert!(!fs.contains(active));
        assert_eq!(fs.read_to_string(backup).unwrap(), "before after");
    }

    #[test]
    fn test_rename_overwrites_destination() {
        let fs = MockFilesystem::new();
        fs.add_file("/a", "new");
        fs.add_file("/b", "old");

        fs.rename(Path::new("/a"), Path::new("/b")).unwrap();
        assert_eq!(fs.paths(), vec![PathBuf::from("/b")]);
        assert_eq!(fs.read_to_string("/b").unwrap(), "new");
    }

    #[test]
    fn test_rename_and_remove_missing() {
        let fs = MockFilesystem::new();
        let err = fs.rename(Path::new("/a"), Path::new("/b")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
        let err = fs.remove(Path::new("/a")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_fail_once() {
        let fs = MockFilesystem::new();
        fs.add_file("/a", "x");
        fs.fail_once(FsOp::Remove);

        assert!(fs.remove(Path::new("/a")).is_err());
        assert!(fs.contains("/a"));
        assert!(fs.remove(Path::new("/a")).is_ok());
    }

    #[test]
    fn test_fail_path_only_matches_that_path() {
        let fs = MockFilesystem::new();
        fs.add_file("/a", "x");
        fs.add_file("/b", "y");
        fs.fail_path(FsOp::Rename, "/a");

        assert!(fs.rename(Path::new("/a"), Path::new("/c")).is_err());
        assert!(fs.rename(Path::new("/b"), Path::new("/d")).is_ok());
        assert!(fs.rename(Path::new("/a"), Path::new("/c")).is_err());

        fs.clear_faults();
        assert!(fs.rename(Path::new("/a"), Path::new("/c")).is_ok());
    }

    #[test]
    fn test_fail_with_kind() {
        let fs = MockFilesystem::new();
        fs.fail_with_kind(FsOp::Stat, io::ErrorKind::PermissionDenied);
        let err = fs.stat(Path::new("/a")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(fs.exists(Path::new("/a")).is_err());
    }

    #[test]
    fn test_write_fault_and_short_write() {
        let fs = MockFilesystem::new();
        let mut file = fs.open_append(Path::new("/a")).unwrap();

        fs.fail_once(FsOp::Write);
        assert!(file.write(b"lost").is_err());

        fs.set_short_writes(Some(3));
        assert_eq!(file.write(b"abcdef").unwrap(), 3);
        assert_eq!(fs.read_to_string("/a").unwrap(), "abc");
    }

    #[test]
    fn test_calls_are_recorded() {
        let fs = MockFilesystem::new();
        let mut file = fs.open_append(Path::new("/a")).unwrap();
        file.write_all(b"x").unwrap();
        file.flush().unwrap();

        assert_eq!(
            fs.calls(),
            vec![
                (FsOp::Open, PathBuf::from("/a")),
                (FsOp::Write, PathBuf::from("/a")),
                (FsOp::Flush, PathBuf::from("/a")),
            ]
        );
        assert_eq!(fs.call_count(FsOp::Write), 1);

        fs.clear_calls();
        assert!(fs.calls().is_empty());
    }

    #[test]
    fn test_clones_share_state() {
        let fs = MockFilesystem::new();
        let other = fs.clone();
        other.add_file("/shared", "1");
        assert!(fs.contains("/shared"));
    }
}
