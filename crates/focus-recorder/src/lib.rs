//! # focus-recorder
//!
//! Watches one build ("reactor run") and republishes what it used.
//!
//! The host feeds every lifecycle and repository event into a
//! [`BuildEventAggregator`]. Once the execution-root project shows up the
//! aggregator records repository interactions; build results tell it which
//! remote repositories the build could see and whether every dependency
//! resolved. At close the recorded artifacts are merged into the bill and,
//! if resolution was healthy and an upload target is configured, the
//! [`ProvisioningDeployer`] re-resolves the bill and deploys it.
//!
//! ## Key components
//!
//! - [`BuildEvent`] — tagged union of everything the host dispatches
//! - [`RepositorySystem`] — the host's resolve/deploy engine
//! - [`BuildEventAggregator`] — Idle → Tracking → Finalizing state machine
//! - [`ProvisioningDeployer`] — bill → resolve → [`DeploymentPlan`] → deploy
//!
//! ## Key invariants
//!
//! - **Sticky failure**: once a build result reports an unresolved
//!   dependency, [`ResolutionHealth`] stays unhealthy for the run and
//!   nothing is deployed.
//! - **Availability over completeness**: a bad event is logged and dropped;
//!   it never aborts the listener or loses recorded state.

pub mod aggregator;
pub mod deployer;
pub mod error;
pub mod events;
pub mod host;

pub use aggregator::{
    BuildEventAggregator, CloseReport, DeploymentStatus, RecorderState, ResolutionHealth,
};
pub use deployer::{DeployInput, DeployOutcome, PlanOutcome, ProvisioningDeployer, SkipReason};
pub use error::{DeployError, HostError, RecorderError};
pub use events::{
    BuildEvent, BuildResult, DependencyResolutionResult, ExecutionEvent, ExecutionEventKind,
    Project, RepositoryEvent, RepositoryEventKind, SessionHandle, SettingsEvent,
};
pub use host::{
    ArtifactRequest, ArtifactResult, DeployResult, DeploymentPlan, PlannedArtifact,
    RepositorySystem,
};
