// manager.rs — The host's local repository seam.
//
// The host never touches its local artifact cache directly: it asks a
// LocalRepositoryManager where things live and whether they are present.
// Managers are created per session by factories; the host picks the factory
// with the highest priority.
//
// SimpleLocalRepositoryManager is the plain default-layout implementation:
//
//   <group as dirs>/<artifact>/<version>/<artifact>-<version>[-<classifier>].<ext>
//
// It keeps no tracking state; presence is a file-exists check.

use std::path::PathBuf;

use focus_core::{ArtifactCoordinate, RepositoryDescriptor, SessionHandle};

use crate::error::AccessLogError;

/// The local repository a manager serves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepository {
    pub basedir: PathBuf,
}

impl LocalRepository {
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        Self {
            basedir: basedir.into(),
        }
    }
}

/// Repository metadata such as `maven-metadata.xml`, at group, artifact or
/// version level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub group: String,
    pub artifact: Option<String>,
    pub version: Option<String>,
    /// File name, e.g. `maven-metadata.xml`.
    pub kind: String,
}

impl Metadata {
    pub fn new(group: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            artifact: None,
            version: None,
            kind: kind.into(),
        }
    }

    pub fn with_artifact(mut self, artifact: impl Into<String>) -> Self {
        self.artifact = Some(artifact.into());
        self
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifactRequest {
    pub artifact: ArtifactCoordinate,
    /// Remote repositories the artifact may have come from.
    pub repositories: Vec<RepositoryDescriptor>,
    pub context: String,
}

impl LocalArtifactRequest {
    pub fn new(artifact: ArtifactCoordinate) -> Self {
        Self {
            artifact,
            repositories: Vec::new(),
            context: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifactResult {
    /// Local file, when present.
    pub file: Option<PathBuf>,
    /// Whether the file may be used for the request's repositories.
    pub available: bool,
    /// Remote repository the file was downloaded from, when known.
    pub repository: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalArtifactRegistration {
    pub artifact: ArtifactCoordinate,
    /// `None` for locally installed artifacts.
    pub repository: Option<RepositoryDescriptor>,
    pub contexts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMetadataRequest {
    pub metadata: Metadata,
    pub repository: Option<RepositoryDescriptor>,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMetadataResult {
    pub file: Option<PathBuf>,
    pub stale: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalMetadataRegistration {
    pub metadata: Metadata,
    pub repository: Option<RepositoryDescriptor>,
    pub contexts: Vec<String>,
}

/// Lookup and registration against the host's local repository.
///
/// Paths returned by the `path_for_*` methods are relative to
/// [`LocalRepository::basedir`].
pub trait LocalRepositoryManager: Send + Sync {
    fn repository(&self) -> &LocalRepository;

    fn path_for_local_artifact(&self, artifact: &ArtifactCoordinate) -> PathBuf;

    fn path_for_remote_artifact(
        &self,
        artifact: &ArtifactCoordinate,
        repository: &RepositoryDescriptor,
        context: &str,
    ) -> PathBuf;

    fn path_for_local_metadata(&self, metadata: &Metadata) -> PathBuf;

    fn path_for_remote_metadata(
        &self,
        metadata: &Metadata,
        repository: &RepositoryDescriptor,
        context: &str,
    ) -> PathBuf;

    fn find_artifact(
        &self,
        session: &SessionHandle,
        request: &LocalArtifactRequest,
    ) -> LocalArtifactResult;

    fn add_artifact(&self, session: &SessionHandle, registration: &LocalArtifactRegistration);

    fn find_metadata(
        &self,
        session: &SessionHandle,
        request: &LocalMetadataRequest,
    ) -> LocalMetadataResult;

    fn add_metadata(&self, session: &SessionHandle, registration: &LocalMetadataRegistration);
}

/// Creates managers for a session. The host uses the highest priority one.
pub trait LocalRepositoryManagerFactory: Send + Sync {
    /// Factory name (for logs and self-exclusion).
    fn name(&self) -> &str;

    fn new_instance(
        &self,
        session: &SessionHandle,
        repository: &LocalRepository,
    ) -> Result<Box<dyn LocalRepositoryManager>, AccessLogError>;

    fn priority(&self) -> f32;
}

/// Default-layout manager with no tracking state.
#[derive(Debug, Clone)]
pub struct SimpleLocalRepositoryManager {
    repository: LocalRepository,
}

impl SimpleLocalRepositoryManager {
    pub fn new(repository: LocalRepository) -> Self {
        Self { repository }
    }

    fn artifact_dir(artifact: &ArtifactCoordinate) -> PathBuf {
        let mut path: PathBuf = artifact.group().split('.').collect();
        path.push(artifact.artifact());
        path.push(artifact.version());
        path
    }

    fn metadata_dir(metadata: &Metadata) -> PathBuf {
        let mut path: PathBuf = metadata.group.split('.').collect();
        if let Some(artifact) = &metadata.artifact {
            path.push(artifact);
            if let Some(version) = &metadata.version {
                path.push(version);
            }
        }
        path
    }
}

/// `maven-metadata.xml` + `local` → `maven-metadata-local.xml`.
fn keyed_file_name(kind: &str, key: &str) -> String {
    match kind.rsplit_once('.') {
        Some((stem, ext)) => format!("{stem}-{key}.{ext}"),
        None => format!("{kind}-{key}"),
    }
}

impl LocalRepositoryManager for SimpleLocalRepositoryManager {
    fn repository(&self) -> &LocalRepository {
        &self.repository
    }

    fn path_for_local_artifact(&self, artifact: &ArtifactCoordinate) -> PathBuf {
        let mut file = format!("{}-{}", artifact.artifact(), artifact.version());
        if let Some(classifier) = artifact.classifier() {
            file.push('-');
            file.push_str(classifier);
        }
        file.push('.');
        file.push_str(artifact.extension());
        Self::artifact_dir(artifact).join(file)
    }

    fn path_for_remote_artifact(
        &self,
        artifact: &ArtifactCoordinate,
        _repository: &RepositoryDescriptor,
        _context: &str,
    ) -> PathBuf {
        self.path_for_local_artifact(artifact)
    }

    fn path_for_local_metadata(&self, metadata: &Metadata) -> PathBuf {
        Self::metadata_dir(metadata).join(keyed_file_name(&metadata.kind, "local"))
    }

    fn path_for_remote_metadata(
        &self,
        metadata: &Metadata,
        repository: &RepositoryDescriptor,
        _context: &str,
    ) -> PathBuf {
        Self::metadata_dir(metadata).join(keyed_file_name(&metadata.kind, &repository.id))
    }

    fn find_artifact(
        &self,
        _session: &SessionHandle,
        request: &LocalArtifactRequest,
    ) -> LocalArtifactResult {
        let file = self
            .repository
            .basedir
            .join(self.path_for_local_artifact(&request.artifact));
        if file.is_file() {
            LocalArtifactResult {
                file: Some(file),
                available: true,
                repository: None,
            }
        } else {
            LocalArtifactResult {
                file: None,
                available: false,
                repository: None,
            }
        }
    }

    fn add_artifact(&self, _session: &SessionHandle, registration: &LocalArtifactRegistration) {
        tracing::trace!("registered {}", registration.artifact);
    }

    fn find_metadata(
        &self,
        _session: &SessionHandle,
        request: &LocalMetadataRequest,
    ) -> LocalMetadataResult {
        let relative = match &request.repository {
            Some(repository) => {
                self.path_for_remote_metadata(&request.metadata, repository, &request.context)
            }
            None => self.path_for_local_metadata(&request.metadata),
        };
        let file = self.repository.basedir.join(relative);
        LocalMetadataResult {
            file: file.is_file().then_some(file),
            stale: false,
        }
    }

    fn add_metadata(&self, _session: &SessionHandle, registration: &LocalMetadataRegistration) {
        tracing::trace!("registered metadata {}", registration.metadata.kind);
    }
}

/// Factory for [`SimpleLocalRepositoryManager`]. Lowest priority.
#[derive(Debug, Clone, Default)]
pub struct SimpleLocalRepositoryManagerFactory;

impl LocalRepositoryManagerFactory for SimpleLocalRepositoryManagerFactory {
    fn name(&self) -> &str {
        "simple"
    }

    fn new_instance(
        &self,
        _session: &SessionHandle,
        repository: &LocalRepository,
    ) -> Result<Box<dyn LocalRepositoryManager>, AccessLogError> {
        Ok(Box::new(SimpleLocalRepositoryManager::new(repository.clone())))
    }

    fn priority(&self) -> f32 {
        0.0
    }
}
