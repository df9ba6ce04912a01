//! rotolog Core - Shared configuration, constants, and error handling

pub mod config;
pub mod constants;
pub mod error;

pub use config::{ConfigFormat, WriterConfig};
pub use error::{ConfigError, Error, Result, RotationOp};
