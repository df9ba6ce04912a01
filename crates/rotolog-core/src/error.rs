//! Error types for rotolog

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Invalid writer configuration, raised before any file is touched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("filename must not be empty")]
    EmptyFilename,

    #[error("max_size must be >= 0, got {0}")]
    NegativeMaxSize(i64),

    #[error("max_backups must be >= 0, got {0}")]
    NegativeMaxBackups(i64),

    #[error("{0}")]
    Invalid(String),
}

/// Filesystem step that failed while rotating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOp {
    Stat,
    Flush,
    Remove,
    Rename,
    Reopen,
}

impl fmt::Display for RotationOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RotationOp::Stat => "stat",
            RotationOp::Flush => "flush",
            RotationOp::Remove => "remove",
            RotationOp::Rename => "rename",
            RotationOp::Reopen => "reopen",
        };
        f.write_str(s)
    }
}

/// rotolog error type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("Failed to stat {}: {source}", path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Rotation failed ({op} {}): {source}", path.display())]
    Rotation {
        op: RotationOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Writer is closed")]
    Closed,

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    YamlError(#[from] serde_yaml::Error),
}

/// Result type alias for rotolog
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(ConfigError::Invalid(msg.into()))
    }

    pub fn stat(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Stat {
            path: path.into(),
            source,
        }
    }

    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Open {
            path: path.into(),
            source,
        }
    }

    pub fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    pub fn rotation(op: RotationOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Rotation {
            op,
            path: path.into(),
            source,
        }
    }

    /// Kind of the underlying filesystem error, if this error wraps one
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Error::Stat { source, .. }
            | Error::Open { source, .. }
            | Error::Write { source, .. }
            | Error::Rotation { source, .. }
            | Error::IoError(source) => Some(source.kind()),
            _ => None,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Closed)
    }
}

impl From<Error> for io::Error {
    fn from(err: Error) -> Self {
        let kind = err.io_kind().unwrap_or(io::ErrorKind::Other);
        io::Error::new(kind, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = Error::from(ConfigError::NegativeMaxSize(-3));
        assert_eq!(err.to_string(), "Config error: max_size must be >= 0, got -3");
        assert_eq!(Error::Closed.to_string(), "Writer is closed");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::IoError(_)));
        assert_eq!(err.io_kind(), Some(io::ErrorKind::NotFound));
    }

    #[test]
    fn test_rotation_error_keeps_source() {
        let source = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = Error::rotation(RotationOp::Rename, "/var/log/app.log.1", source);

        assert_eq!(
            err.to_string(),
            "Rotation failed (rename /var/log/app.log.1): denied"
        );
        let inner = err.source().unwrap().downcast_ref::<io::Error>().unwrap();
        assert_eq!(inner.kind(), io::ErrorKind::PermissionDenied);
    }

    #[test]
    fn test_into_io_error_preserves_kind() {
        let err = Error::write("app.log", io::Error::new(io::ErrorKind::WriteZero, "full"));
        let io_err: io::Error = err.into();
        assert_eq!(io_err.kind(), io::ErrorKind::WriteZero);

        let closed: io::Error = Error::Closed.into();
        assert_eq!(closed.kind(), io::ErrorKind::Other);
        let inner = closed.into_inner().unwrap();
        assert!(inner.downcast_ref::<Error>().unwrap().is_closed());
    }
}
