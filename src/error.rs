//! Fatal configuration errors.
//!
//! Everything the pipeline encounters mid-run is recoverable at the file
//! level and is swallowed with a log entry; the errors here are the only
//! conditions that abort before the pipeline starts.

use std::path::PathBuf;

/// Configuration problems that prevent a run from starting.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// No directories were supplied to scan.
    #[error("no directories to search")]
    NoDirectories,

    /// A supplied root directory does not exist.
    #[error("directory not found: {0}")]
    RootNotFound(PathBuf),

    /// A supplied root path exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),
}
