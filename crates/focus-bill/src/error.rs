// error.rs — Error types for bill persistence.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing or reading a bill.
#[derive(Debug, Error)]
pub enum BillError {
    /// Reading, writing or renaming the bill file failed.
    #[error("bill I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A line in the bill is not a valid artifact coordinate.
    #[error("bad entry on line {line} of {path}: {source}")]
    BadEntry {
        path: PathBuf,
        line: usize,
        source: focus_core::CoordinateError,
    },
}
