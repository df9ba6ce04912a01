//! Async capture of line-oriented output into a rotating log

use chrono::Utc;
use rotolog_core::{Error, Result};
use rotolog_fs::{Filesystem, OsFilesystem};
use std::borrow::Cow;
use std::io;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::writer::RotatingWriter;

/// Pumps lines from a reader (stdin, a child's stdout) into a rotating log.
///
/// Each line is handed to the writer as a single write, so rotation never
/// splits a line across two files.
pub struct LogCapture<F: Filesystem = OsFilesystem> {
    writer: Arc<RotatingWriter<F>>,
    timestamps: bool,
    echo: bool,
}

impl<F: Filesystem + 'static> LogCapture<F> {
    pub fn new(writer: Arc<RotatingWriter<F>>) -> Self {
        Self {
            writer,
            timestamps: false,
            echo: false,
        }
    }

    /// Prefix every line with `[YYYY-mm-dd HH:MM:SS] ` (UTC)
    pub fn with_timestamps(mut self, enabled: bool) -> Self {
        self.timestamps = enabled;
        self
    }

    /// Copy every captured line to stdout as well
    pub fn with_echo(mut self, enabled: bool) -> Self {
        self.echo = enabled;
        self
    }

    /// Read until EOF, returning the number of lines written.
    ///
    /// Write failures are logged and skipped; capture stops early once the
    /// writer has been closed.
    pub async fn run<R: AsyncRead + Unpin>(&self, reader: R) -> Result<u64> {
        let mut reader = BufReader::new(reader);
        let mut stdout = tokio::io::stdout();
        let mut line = Vec::new();
        let mut count = 0u64;

        loop {
            line.clear();
            if reader.read_until(b'\n', &mut line).await? == 0 {
                break;
            }

            let record = self.format(&line);
            match self.write_record(&record) {
                Ok(()) => count += 1,
                Err(Error::Closed) => {
                    debug!("Log writer closed, stopping capture");
                    break;
                }
                Err(e) => warn!("Failed to write log line: {}", e),
            }

            if self.echo {
                stdout.write_all(&record).await?;
            }
        }

        if self.echo {
            stdout.flush().await?;
        }
        Ok(count)
    }

    /// Spawn a task capturing `reader` until EOF
    pub fn spawn<R>(self, reader: R) -> JoinHandle<Result<u64>>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        tokio::spawn(async move { self.run(reader).await })
    }

    fn format<'a>(&self, line: &'a [u8]) -> Cow<'a, [u8]> {
        if !self.timestamps {
            return Cow::Borrowed(line);
        }
        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S");
        let mut record = format!("[{}] ", timestamp).into_bytes();
        record.extend_from_slice(line);
        Cow::Owned(record)
    }

    fn write_record(&self, record: &[u8]) -> Result<()> {
        let mut rest = record;
        while !rest.is_empty() {
            let n = self.writer.write(rest)?;
            if n == 0 {
                return Err(Error::write(
                    self.writer.path(),
                    io::Error::from(io::ErrorKind::WriteZero),
                ));
            }
            rest = &rest[n..];
        }
        Ok(())
    }
}
