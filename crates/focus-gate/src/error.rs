// error.rs — Error types for repository gating.

use thiserror::Error;

/// Errors that abort the configuration step.
#[derive(Debug, Error)]
pub enum GateError {
    /// No profile declares a repository with the focus id.
    #[error("focus repository '{id}' is not configured")]
    FocusRepositoryNotConfigured { id: String },

    /// The host's own configuration processor failed.
    #[error("configuration processing failed: {0}")]
    Delegate(String),
}
