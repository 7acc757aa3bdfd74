// SPDX-License-Identifier: Apache-2.0 OR MIT
// Crate-wide error type

use std::path::PathBuf;
use thiserror::Error;

/// Errors reported by loggers, sinks and the worker pool
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid construction parameters (worker count, queue size, rotation limits)
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A log file could not be opened or created
    #[error("failed to open log file '{}': {source}", path.display())]
    OpenFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Filesystem write/rename/remove failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The async logger's worker pool has been dropped
    #[error("worker pool is no longer alive")]
    PoolGone,

    /// Registry refused a duplicate logger name
    #[error("a logger named '{0}' is already registered")]
    AlreadyExists(String),
}

pub type Result<T> = std::result::Result<T, Error>;
