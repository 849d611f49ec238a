//! The host's artifact resolution and deployment engine, as the recorder sees it.

use std::path::PathBuf;

use focus_core::{ArtifactCoordinate, RepositoryDescriptor};

use crate::error::HostError;
use crate::events::SessionHandle;

/// Resolve one artifact from the given repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRequest {
    pub coordinate: ArtifactCoordinate,
    pub repositories: Vec<RepositoryDescriptor>,
}

/// Outcome of resolving one [`ArtifactRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArtifactResult {
    /// Found. `file` is where the host materialized it locally.
    Resolved {
        coordinate: ArtifactCoordinate,
        file: Option<PathBuf>,
        repository: Option<String>,
    },
    /// Not present in any of the requested repositories.
    Missing { coordinate: ArtifactCoordinate },
}

impl ArtifactResult {
    pub fn coordinate(&self) -> &ArtifactCoordinate {
        match self {
            ArtifactResult::Resolved { coordinate, .. } => coordinate,
            ArtifactResult::Missing { coordinate } => coordinate,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ArtifactResult::Missing { .. })
    }
}

/// An artifact ready for upload: coordinate plus its local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedArtifact {
    pub coordinate: ArtifactCoordinate,
    pub file: PathBuf,
}

/// What gets deployed, and where.
///
/// Artifacts are ordered by canonical coordinate string so the same bill
/// against the same remote state always yields the same plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentPlan {
    pub target: RepositoryDescriptor,
    pub artifacts: Vec<PlannedArtifact>,

    /// Bill entries left out because they could not be resolved to a file.
    pub excluded: Vec<ArtifactCoordinate>,
}

/// Outcome of a deploy call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployResult {
    pub deployed: Vec<ArtifactCoordinate>,
}

/// Resolve/deploy capability provided by the host.
///
/// Calls are synchronous and may take arbitrarily long; timeouts and
/// cancellation are the implementation's business.
pub trait RepositorySystem: Send + Sync {
    /// Resolve every request. One result per request, in request order.
    fn resolve_artifacts(
        &self,
        session: &SessionHandle,
        requests: &[ArtifactRequest],
    ) -> Result<Vec<ArtifactResult>, HostError>;

    /// Upload the plan's artifacts to its target repository.
    fn deploy(
        &self,
        session: &SessionHandle,
        plan: &DeploymentPlan,
    ) -> Result<DeployResult, HostError>;
}
