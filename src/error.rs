//! Error types for portscan.
//!
//! Uses `thiserror` for ergonomic error definitions. Note that none of these
//! stop a running scan: dial errors become failure outcomes and bad range
//! tokens are skipped with a diagnostic.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single connection attempt.
///
/// The `Display` text is what ends up after `"<port>: "` in verbose output.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("i/o timeout after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for scan operations.
pub type ScanResult<T> = Result<T, ScanError>;

/// Errors raised while loading settings or building a scan configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not determine configuration directory")]
    DirectoryNotFound,

    #[error("failed to read {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    #[error("invalid settings format: {0}")]
    InvalidFormat(String),

    #[error("invalid configuration: {0}")]
    InvalidValue(String),
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidFormat(e.to_string())
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors surfaced by the command-line front end.
#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type CliResult<T> = Result<T, CliError>;
