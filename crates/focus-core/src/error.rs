// error.rs — Error types for coordinates and configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while parsing an artifact coordinate string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoordinateError {
    /// The string did not split into 3 to 5 colon-separated segments.
    #[error("bad artifact coordinate '{input}': expected <group>:<artifact>[:<extension>[:<classifier>]]:<version>")]
    BadFormat { input: String },

    /// One of the required segments was empty.
    #[error("bad artifact coordinate '{input}': {segment} must not be empty")]
    EmptySegment { input: String, segment: &'static str },
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema.
    #[error("failed to parse config at {path}: {source}")]
    ParseFailed {
        path: PathBuf,
        source: toml::de::Error,
    },
}
