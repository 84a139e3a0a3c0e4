//! Common error types for xmp-interp

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for xmp-interp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the xmp-interp crates
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error without a more specific path
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O operation error on a known path
    #[error("IO error on {path}: {source}")]
    IoAt {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// An allow-listed field carries a value that is not a decimal number
    #[error("Invalid value {value:?} for {field} at {path}:{line}")]
    InvalidValue {
        path: PathBuf,
        /// 1-based line number
        line: usize,
        field: String,
        value: String,
    },

    /// Target path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl Error {
    /// Wrap an I/O error with the path it happened on
    pub fn io_at(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::IoAt {
            path: path.into(),
            source,
        }
    }
}
