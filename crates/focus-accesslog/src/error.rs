// error.rs — Error types for the access log and local repository managers.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AccessLogError {
    /// Reading or appending the access log failed.
    #[error("access log I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// No other local repository manager factory is registered to wrap.
    #[error("no local repository manager factory available to delegate to")]
    NoDelegate,
}
