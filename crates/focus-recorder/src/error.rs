// error.rs — Error types for recording and redeployment.

use thiserror::Error;

use focus_bill::BillError;

/// Failures reported by the host's repository system.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    /// The resolve call as a whole failed (not a single missing artifact).
    #[error("artifact resolution failed: {0}")]
    Resolution(String),

    /// The deploy call failed (network, authorization, ...).
    #[error("deployment failed: {0}")]
    Deployment(String),
}

/// Errors from one deployer run.
#[derive(Debug, Error)]
pub enum DeployError {
    /// The upload target is not among the repositories the build could see.
    #[error("target repository '{id}' is unknown; is it configured?")]
    TargetRepositoryUnknown { id: String },

    /// The bill could not be read back.
    #[error("cannot read bill: {0}")]
    Bill(#[from] BillError),

    /// Re-resolving the bill failed outright.
    #[error("problem resolving artifacts: {0}")]
    Resolution(#[source] HostError),

    /// The deploy call failed. Not retried.
    #[error("problem deploying artifacts: {0}")]
    Deployment(#[source] HostError),
}

impl DeployError {
    /// Configuration problems abort; everything else degrades gracefully.
    pub fn is_configuration(&self) -> bool {
        matches!(self, DeployError::TargetRepositoryUnknown { .. })
    }
}

/// Errors surfaced by the aggregator.
#[derive(Debug, Error)]
pub enum RecorderError {
    /// The access restriction cannot be honored. Fatal to the close step.
    #[error("configuration error: {0}")]
    Configuration(#[source] DeployError),

    /// Handling a single event failed. Logged and dropped, never returned
    /// from `handle_event`.
    #[error("event processing failed: {0}")]
    EventProcessing(String),
}
