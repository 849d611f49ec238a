// events.rs — The event stream the host dispatches during a build.
//
// The host's listener interface hands over one polymorphic event at a time.
// Here that is a closed enum, so the aggregator matches on variants instead
// of probing runtime types:
//
//   Execution   — lifecycle progress (project/mojo/fork started, ...)
//   Repository  — one interaction with a repository (resolve, download, ...)
//   BuildResult — the final outcome of the build, with its remote repositories
//   Settings    — settings building request/result (observed, not used)

use std::path::PathBuf;

use focus_core::{ArtifactCoordinate, RepositoryDescriptor};

pub use focus_core::SessionHandle;

/// A project taking part in the build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    /// `group:artifact:version` style id, for logs.
    pub id: String,

    /// Whether this is the project the build was started from.
    pub execution_root: bool,

    /// Where compiled output lands (e.g. `target/classes`).
    pub output_directory: PathBuf,

    /// Remote repositories resolved for this project, mirrors applied.
    pub remote_repositories: Vec<RepositoryDescriptor>,
}

impl Project {
    pub fn new(id: impl Into<String>, output_directory: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            execution_root: false,
            output_directory: output_directory.into(),
            remote_repositories: Vec::new(),
        }
    }

    pub fn as_execution_root(mut self) -> Self {
        self.execution_root = true;
        self
    }

    pub fn with_remote_repositories(mut self, repositories: Vec<RepositoryDescriptor>) -> Self {
        self.remote_repositories = repositories;
        self
    }
}

/// Lifecycle step reported by an [`ExecutionEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionEventKind {
    ProjectDiscoveryStarted,
    SessionStarted,
    SessionEnded,
    ProjectSkipped,
    ProjectStarted,
    ProjectSucceeded,
    ProjectFailed,
    MojoSkipped,
    MojoStarted,
    MojoSucceeded,
    MojoFailed,
    ForkStarted,
    ForkSucceeded,
    ForkFailed,
    ForkedProjectStarted,
    ForkedProjectSucceeded,
    ForkedProjectFailed,
}

/// Lifecycle progress, optionally tied to a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionEvent {
    pub kind: ExecutionEventKind,
    pub project: Option<Project>,
}

/// What happened in a [`RepositoryEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryEventKind {
    ArtifactDescriptorInvalid,
    ArtifactDescriptorMissing,
    MetadataInvalid,
    ArtifactResolving,
    ArtifactResolved,
    MetadataResolving,
    MetadataResolved,
    ArtifactDownloading,
    ArtifactDownloaded,
    MetadataDownloading,
    MetadataDownloaded,
    ArtifactInstalling,
    ArtifactInstalled,
    MetadataInstalling,
    MetadataInstalled,
    ArtifactDeploying,
    ArtifactDeployed,
    MetadataDeploying,
    MetadataDeployed,
}

/// One interaction between the build and a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryEvent {
    pub kind: RepositoryEventKind,

    /// The artifact involved. Metadata events carry none.
    pub artifact: Option<ArtifactCoordinate>,

    /// Id of the repository involved, when known.
    pub repository: Option<String>,

    pub session: SessionHandle,
}

impl RepositoryEvent {
    pub fn new(kind: RepositoryEventKind, session: SessionHandle) -> Self {
        Self {
            kind,
            artifact: None,
            repository: None,
            session,
        }
    }

    pub fn with_artifact(mut self, artifact: ArtifactCoordinate) -> Self {
        self.artifact = Some(artifact);
        self
    }

    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }
}

/// Dependencies the build failed to resolve.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyResolutionResult {
    pub unresolved: Vec<ArtifactCoordinate>,
}

/// Final outcome of the build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildResult {
    /// The top-level project. Its remote repositories are the most complete
    /// picture of what the build could reach.
    pub project: Option<Project>,

    /// Absent when the host did not resolve dependencies at all.
    pub dependency_resolution: Option<DependencyResolutionResult>,
}

/// Settings-related notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEvent {
    BuildingRequest,
    BuildingResult,
}

/// Everything the host dispatches to the aggregator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildEvent {
    Execution(ExecutionEvent),
    Repository(RepositoryEvent),
    BuildResult(BuildResult),
    Settings(SettingsEvent),
}

impl BuildEvent {
    /// Short variant name for logs.
    pub fn event_type(&self) -> &'static str {
        match self {
            BuildEvent::Execution(_) => "execution",
            BuildEvent::Repository(_) => "repository",
            BuildEvent::BuildResult(_) => "build_result",
            BuildEvent::Settings(_) => "settings",
        }
    }

    /// Lifecycle event for `project`.
    pub fn execution(kind: ExecutionEventKind, project: Project) -> Self {
        BuildEvent::Execution(ExecutionEvent {
            kind,
            project: Some(project),
        })
    }

    /// Repository event touching `artifact`.
    pub fn artifact(
        kind: RepositoryEventKind,
        artifact: ArtifactCoordinate,
        session: &SessionHandle,
    ) -> Self {
        BuildEvent::Repository(RepositoryEvent::new(kind, session.clone()).with_artifact(artifact))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_names() {
        let session = SessionHandle::new("s-1");
        let coord: ArtifactCoordinate = "a:b:jar:1".parse().unwrap();
        assert_eq!(
            BuildEvent::artifact(RepositoryEventKind::ArtifactResolved, coord, &session)
                .event_type(),
            "repository"
        );
        assert_eq!(
            BuildEvent::BuildResult(BuildResult::default()).event_type(),
            "build_result"
        );
        assert_eq!(
            BuildEvent::Settings(SettingsEvent::BuildingRequest).event_type(),
            "settings"
        );
    }

    #[test]
    fn project_builder_marks_root() {
        let project = Project::new("acme:app:1.0", "/w/target/classes").as_execution_root();
        assert!(project.execution_root);
        assert!(project.remote_repositories.is_empty());
    }
}
