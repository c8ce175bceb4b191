//! Error types shared by the loader, the curve transformer and the pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for ferrite-live operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading or transforming a run log.
///
/// Every variant is recoverable at the presentation boundary: callers render
/// a placeholder for the current tick and carry on.
#[derive(Debug, Error)]
pub enum Error {
    /// The log file does not exist (yet). The writer may not have started.
    #[error("run log not found: {}", .0.display())]
    NotFound(PathBuf),

    /// A row or field of the log could not be parsed.
    #[error("line {line}: cannot parse {column} from '{value}'")]
    Parse {
        /// 1-based line number in the log file.
        line: usize,
        /// Name of the offending column, or a short description of the row fault.
        column: String,
        /// The raw text that failed to parse.
        value: String,
    },

    /// Smoothing was requested on a zero-length series.
    #[error("cannot smooth an empty series")]
    EmptyInput,

    /// Smoothing weight outside [0, 1] (or NaN).
    #[error("smoothing weight {0} is outside [0, 1]")]
    InvalidWeight(f64),

    /// Column name that does not match any of the five log columns.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// Invalid viewer configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Any other I/O failure while reading the log or a config file.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for conditions that simply mean "nothing to display yet".
    pub fn is_no_data(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
