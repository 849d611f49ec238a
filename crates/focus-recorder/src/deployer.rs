// deployer.rs — ProvisioningDeployer: republish a build's bill to one repository.
//
// Runs once, at the end of a build:
//
// 1. Unhealthy resolution → skip. An incomplete set is never republished.
// 2. Pick the upload target among the repositories the build could see.
//    Unknown id → TargetRepositoryUnknown (configuration error).
// 3. Read the bill back (deduplicated, sorted).
// 4. Resolve every entry in one call; missing entries, and entries the host
//    returned no result for, are warned about and excluded. They don't sink
//    the batch.
// 5. Build the DeploymentPlan from entries that resolved to a local file.
// 6. Deploy once. Failures are reported, never retried.
//
// Given the same bill and remote state the plan is identical, so a failed
// run can simply be repeated.

use std::collections::HashSet;
use std::sync::Arc;

use focus_bill::BillStore;
use focus_core::{ArtifactCoordinate, FocusConfig, RepositoryDescriptor};

use crate::aggregator::ResolutionHealth;
use crate::error::DeployError;
use crate::events::SessionHandle;
use crate::host::{ArtifactRequest, ArtifactResult, DeploymentPlan, PlannedArtifact, RepositorySystem};

/// Everything a deployer run needs from the finished build.
#[derive(Debug, Clone, Copy)]
pub struct DeployInput<'a> {
    pub bill: &'a BillStore,
    pub health: ResolutionHealth,
    /// Remote repositories reported by the build result.
    pub remote_repositories: &'a [RepositoryDescriptor],
    pub session: Option<&'a SessionHandle>,
}

/// Why a run ended without a deploy call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// At least one dependency failed to resolve during the build.
    UnresolvedDependencies,
    /// The bill has no entries.
    EmptyBill,
    /// No repository session was ever observed to resolve with.
    NoSession,
    /// Nothing in the bill resolved to a local file.
    NothingResolved,
}

/// Result of the planning steps that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanOutcome {
    /// Deploy `plan` using the session it was resolved with.
    Ready {
        plan: DeploymentPlan,
        session: SessionHandle,
    },
    Skipped(SkipReason),
}

/// Result of a deployer run that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeployOutcome {
    Skipped(SkipReason),
    Deployed {
        plan: DeploymentPlan,
        deployed: Vec<ArtifactCoordinate>,
    },
}

/// Re-resolves a bill and deploys it to the upload target.
pub struct ProvisioningDeployer {
    system: Arc<dyn RepositorySystem>,
    upload_repo: String,
    allowed_repositories: Vec<String>,
}

impl ProvisioningDeployer {
    pub fn new(
        system: Arc<dyn RepositorySystem>,
        upload_repo: impl Into<String>,
        allowed_repositories: Vec<String>,
    ) -> Self {
        Self {
            system,
            upload_repo: upload_repo.into(),
            allowed_repositories,
        }
    }

    /// A deployer for `config`, or `None` when no upload target is set.
    pub fn from_config(system: Arc<dyn RepositorySystem>, config: &FocusConfig) -> Option<Self> {
        let upload_repo = config.upload_target()?;
        Some(Self::new(
            system,
            upload_repo,
            config.allowed_repositories.clone(),
        ))
    }

    pub fn upload_repo(&self) -> &str {
        &self.upload_repo
    }

    /// The repository with the upload id among `remotes`.
    pub fn select_target(
        &self,
        remotes: &[RepositoryDescriptor],
    ) -> Result<RepositoryDescriptor, DeployError> {
        tracing::info!("Repositories configured: {}", remotes.len());
        remotes
            .iter()
            .find(|r| r.id == self.upload_repo)
            .cloned()
            .ok_or_else(|| DeployError::TargetRepositoryUnknown {
                id: self.upload_repo.clone(),
            })
    }

    /// Repositories entries may be resolved from: all of `remotes`, or only
    /// the allowed ids when that list is non-empty.
    pub fn resolve_sources(&self, remotes: &[RepositoryDescriptor]) -> Vec<RepositoryDescriptor> {
        let sources: Vec<RepositoryDescriptor> = if self.allowed_repositories.is_empty() {
            remotes.to_vec()
        } else {
            remotes
                .iter()
                .filter(|r| self.allowed_repositories.contains(&r.id))
                .cloned()
                .collect()
        };
        for repo in &sources {
            tracing::debug!("Allowed repo: {} ({})", repo.id, repo.url);
        }
        sources
    }

    /// Steps 1–5: decide whether to deploy and build the plan.
    pub fn plan(&self, input: &DeployInput<'_>) -> Result<PlanOutcome, DeployError> {
        if !input.health.is_healthy() {
            tracing::info!("Won't deploy due to unresolved dependencies.");
            return Ok(PlanOutcome::Skipped(SkipReason::UnresolvedDependencies));
        }

        let target = self.select_target(input.remote_repositories)?;
        let sources = self.resolve_sources(input.remote_repositories);

        let coordinates = read_coordinates(input.bill)?;
        if coordinates.is_empty() {
            tracing::info!("Bill {} is empty, nothing to deploy.", input.bill.path().display());
            return Ok(PlanOutcome::Skipped(SkipReason::EmptyBill));
        }

        let Some(session) = input.session else {
            tracing::warn!("No repository session observed, cannot resolve the bill.");
            return Ok(PlanOutcome::Skipped(SkipReason::NoSession));
        };

        tracing::info!("Preparing deployment request..");
        let requests: Vec<ArtifactRequest> = coordinates
            .into_iter()
            .map(|coordinate| ArtifactRequest {
                coordinate,
                repositories: sources.clone(),
            })
            .collect();
        let results = self
            .system
            .resolve_artifacts(session, &requests)
            .map_err(DeployError::Resolution)?;

        let mut artifacts = Vec::new();
        let mut excluded = Vec::new();

        if results.len() != requests.len() {
            tracing::warn!(
                "Resolver returned {} results for {} requests.",
                results.len(),
                requests.len()
            );
        }
        let answered: HashSet<&ArtifactCoordinate> =
            results.iter().map(|r| r.coordinate()).collect();
        for request in &requests {
            if !answered.contains(&request.coordinate) {
                tracing::warn!("No resolution result for {}.", request.coordinate);
                excluded.push(request.coordinate.clone());
            }
        }

        for result in results {
            match result {
                ArtifactResult::Resolved {
                    coordinate,
                    file: Some(file),
                    ..
                } => artifacts.push(PlannedArtifact { coordinate, file }),
                ArtifactResult::Resolved {
                    coordinate,
                    file: None,
                    ..
                } => {
                    tracing::warn!("Artifact {} resolved without a local file.", coordinate);
                    excluded.push(coordinate);
                }
                ArtifactResult::Missing { coordinate } => {
                    tracing::warn!("Artifact {} is still missing.", coordinate);
                    excluded.push(coordinate);
                }
            }
        }
        artifacts.sort_by_key(|a| a.coordinate.to_string());

        if artifacts.is_empty() {
            return Ok(PlanOutcome::Skipped(SkipReason::NothingResolved));
        }

        Ok(PlanOutcome::Ready {
            plan: DeploymentPlan {
                target,
                artifacts,
                excluded,
            },
            session: session.clone(),
        })
    }

    /// Run all steps, including the deploy call.
    pub fn deploy(&self, input: &DeployInput<'_>) -> Result<DeployOutcome, DeployError> {
        let (plan, session) = match self.plan(input)? {
            PlanOutcome::Ready { plan, session } => (plan, session),
            PlanOutcome::Skipped(reason) => return Ok(DeployOutcome::Skipped(reason)),
        };

        tracing::info!(
            "Deployment of {} artifacts to {} ..",
            plan.artifacts.len(),
            plan.target.id
        );
        let result = self
            .system
            .deploy(&session, &plan)
            .map_err(DeployError::Deployment)?;
        tracing::info!("Deployment Result: {}", result.deployed.len());

        Ok(DeployOutcome::Deployed {
            plan,
            deployed: result.deployed,
        })
    }
}

/// Bill entries as coordinates. Unparseable lines are warned about and skipped.
fn read_coordinates(bill: &BillStore) -> Result<Vec<ArtifactCoordinate>, DeployError> {
    let mut coordinates = Vec::new();
    for line in bill.read_lines()? {
        match line.parse::<ArtifactCoordinate>() {
            Ok(coordinate) => coordinates.push(coordinate),
            Err(e) => tracing::warn!("Skipping bill entry: {}", e),
        }
    }
    Ok(coordinates)
}
