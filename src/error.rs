//! Error types for logging configuration and maintenance operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the registry and its sinks.
///
/// Emit calls never return these; degraded modes (missing directory at
/// logger creation, unsupported terminal color) are handled in place. The
/// typed variants cover the maintenance operations the caller must react to.
#[derive(Debug, Error)]
pub enum Error {
    /// A maintenance operation ran before `set_log_directory`.
    #[error("log directory is not set; call set_log_directory first")]
    DirectoryNotSet,

    /// The configured log directory no longer exists on disk.
    #[error("log directory does not exist: '{}'", .0.display())]
    DirectoryMissing(PathBuf),

    /// A level string did not match any known severity.
    #[error("unknown log level: '{0}'")]
    InvalidLevel(String),

    /// Underlying filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
