// recording.rs — AccessRecordingManager: a pass-through manager with a trace.
//
// Every call goes to the wrapped manager unchanged. The one side effect:
// artifact lookups (find_artifact) are appended to the access log before
// being delegated. A failed append is logged and otherwise ignored.
//
// AccessRecordingFactory registers with priority 100 so the host picks it,
// and wraps whichever other registered factory has the highest priority.

use std::path::PathBuf;
use std::sync::Arc;

use focus_core::{ArtifactCoordinate, RepositoryDescriptor, SessionHandle};

use crate::error::AccessLogError;
use crate::log::AccessLog;
use crate::manager::{
    LocalArtifactRegistration, LocalArtifactRequest, LocalArtifactResult,
    LocalMetadataRegistration, LocalMetadataRequest, LocalMetadataResult, LocalRepository,
    LocalRepositoryManager, LocalRepositoryManagerFactory, Metadata,
};

/// Name the recording factory registers under.
pub const RECORDING_FACTORY_NAME: &str = "focus-recorder";

const RECORDING_PRIORITY: f32 = 100.0;

/// Wraps a local repository manager and traces artifact lookups.
pub struct AccessRecordingManager {
    delegate: Box<dyn LocalRepositoryManager>,
    log: AccessLog,
}

impl AccessRecordingManager {
    /// Trace lookups into `<repository basedir>/artifact-request.log`.
    pub fn new(delegate: Box<dyn LocalRepositoryManager>, repository: &LocalRepository) -> Self {
        Self {
            delegate,
            log: AccessLog::for_repository(repository),
        }
    }

    pub fn access_log(&self) -> &AccessLog {
        &self.log
    }

    fn record(&self, artifact: &ArtifactCoordinate) {
        if let Err(e) = self.log.append(artifact) {
            tracing::warn!("Could not record access to {}: {}", artifact, e);
        }
    }
}

impl LocalRepositoryManager for AccessRecordingManager {
    fn repository(&self) -> &LocalRepository {
        self.delegate.repository()
    }

    fn path_for_local_artifact(&self, artifact: &ArtifactCoordinate) -> PathBuf {
        self.delegate.path_for_local_artifact(artifact)
    }

    fn path_for_remote_artifact(
        &self,
        artifact: &ArtifactCoordinate,
        repository: &RepositoryDescriptor,
        context: &str,
    ) -> PathBuf {
        self.delegate
            .path_for_remote_artifact(artifact, repository, context)
    }

    fn path_for_local_metadata(&self, metadata: &Metadata) -> PathBuf {
        self.delegate.path_for_local_metadata(metadata)
    }

    fn path_for_remote_metadata(
        &self,
        metadata: &Metadata,
        repository: &RepositoryDescriptor,
        context: &str,
    ) -> PathBuf {
        self.delegate
            .path_for_remote_metadata(metadata, repository, context)
    }

    fn find_artifact(
        &self,
        session: &SessionHandle,
        request: &LocalArtifactRequest,
    ) -> LocalArtifactResult {
        self.record(&request.artifact);
        self.delegate.find_artifact(session, request)
    }

    fn add_artifact(&self, session: &SessionHandle, registration: &LocalArtifactRegistration) {
        self.delegate.add_artifact(session, registration)
    }

    fn find_metadata(
        &self,
        session: &SessionHandle,
        request: &LocalMetadataRequest,
    ) -> LocalMetadataResult {
        self.delegate.find_metadata(session, request)
    }

    fn add_metadata(&self, session: &SessionHandle, registration: &LocalMetadataRegistration) {
        self.delegate.add_metadata(session, registration)
    }
}

/// Factory producing [`AccessRecordingManager`]s around the best other factory.
pub struct AccessRecordingFactory {
    factories: Vec<Arc<dyn LocalRepositoryManagerFactory>>,
}

impl AccessRecordingFactory {
    /// `factories` is every factory registered with the host, in registration
    /// order. It may include this factory itself; that entry is skipped.
    pub fn new(factories: Vec<Arc<dyn LocalRepositoryManagerFactory>>) -> Self {
        Self { factories }
    }

    /// The factory managers are delegated to: highest priority wins, the
    /// first registered wins a tie.
    pub fn delegate(&self) -> Option<&Arc<dyn LocalRepositoryManagerFactory>> {
        let mut best: Option<&Arc<dyn LocalRepositoryManagerFactory>> = None;
        for factory in &self.factories {
            if factory.name() == RECORDING_FACTORY_NAME {
                continue;
            }
            match best {
                Some(current) if current.priority() >= factory.priority() => {}
                _ => best = Some(factory),
            }
        }
        best
    }
}

impl LocalRepositoryManagerFactory for AccessRecordingFactory {
    fn name(&self) -> &str {
        RECORDING_FACTORY_NAME
    }

    fn new_instance(
        &self,
        session: &SessionHandle,
        repository: &LocalRepository,
    ) -> Result<Box<dyn LocalRepositoryManager>, AccessLogError> {
        let delegate = self.delegate().ok_or(AccessLogError::NoDelegate)?;
        tracing::debug!(
            "recording local repository access through {} (priority {})",
            delegate.name(),
            delegate.priority()
        );
        let inner = delegate.new_instance(session, repository)?;
        Ok(Box::new(AccessRecordingManager::new(inner, repository)))
    }

    fn priority(&self) -> f32 {
        RECORDING_PRIORITY
    }
}
