// aggregator.rs — BuildEventAggregator: record what one build touched.
//
// State machine per build:
//
//   Idle ──(execution event for the root project, first one only)──▶ Tracking
//   Tracking ──(close)──▶ Finalizing   (terminal; later events are ignored)
//
// While Tracking and enabled, every repository event is kept; the first
// one's session is retained for the deploy calls. Build results refresh the
// list of remote repositories and may flip resolution health to unhealthy,
// which is sticky for the rest of the run.
//
// The host may dispatch from several worker threads, so all run state sits
// behind one Mutex: one root transition at most, and an append-only log.
// Closing takes what it needs out of the lock before touching the disk or
// the network.

use std::mem;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use focus_bill::BillStore;
use focus_core::{FocusConfig, RepositoryDescriptor};

use crate::deployer::{DeployInput, DeployOutcome, ProvisioningDeployer};
use crate::error::RecorderError;
use crate::events::{BuildEvent, BuildResult, ExecutionEvent, Project, RepositoryEvent, SessionHandle};
use crate::host::RepositorySystem;

/// Where the aggregator is in its per-build lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    /// No execution root seen yet; repository events are not recorded.
    Idle,
    /// Root identified; repository events are being recorded.
    Tracking,
    /// Closed. Nothing is accepted any more.
    Finalizing,
}

/// Whether every dependency of the run resolved.
///
/// Nothing turns `Unhealthy` back into `Healthy` within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResolutionHealth {
    #[default]
    Healthy,
    Unhealthy,
}

impl ResolutionHealth {
    pub fn is_healthy(self) -> bool {
        self == ResolutionHealth::Healthy
    }

    fn degrade(&mut self) {
        *self = ResolutionHealth::Unhealthy;
    }
}

/// What happened to deployment at close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeploymentStatus {
    /// Recording disabled, no execution root, or no upload target.
    NotRequested,
    /// The bill could not be written, so nothing from this run is trusted.
    BillUnavailable,
    /// The deployer ran to completion (deployed or skipped).
    Completed(DeployOutcome),
    /// Resolution or deployment failed; logged, not retried.
    Failed(String),
}

/// Summary returned by [`BuildEventAggregator::close`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseReport {
    /// The bill file, when one was written.
    pub bill_path: Option<PathBuf>,
    /// Distinct entries in the bill after merging this run.
    pub distinct_artifacts: usize,
    pub deployment: DeploymentStatus,
}

impl CloseReport {
    fn nothing_recorded() -> Self {
        Self {
            bill_path: None,
            distinct_artifacts: 0,
            deployment: DeploymentStatus::NotRequested,
        }
    }
}

#[derive(Debug, Default)]
struct RunState {
    finalizing: bool,
    root: Option<Project>,
    event_log: Vec<RepositoryEvent>,
    session: Option<SessionHandle>,
    remote_repositories: Vec<RepositoryDescriptor>,
    health: ResolutionHealth,
}

impl RunState {
    fn state(&self) -> RecorderState {
        if self.finalizing {
            RecorderState::Finalizing
        } else if self.root.is_some() {
            RecorderState::Tracking
        } else {
            RecorderState::Idle
        }
    }
}

/// Listens to one build and turns its repository traffic into a bill.
pub struct BuildEventAggregator {
    config: FocusConfig,
    deployer: Option<ProvisioningDeployer>,
    run: Mutex<RunState>,
}

impl BuildEventAggregator {
    /// An aggregator that records (when `config.enabled`) but never deploys.
    pub fn new(config: FocusConfig) -> Self {
        Self {
            config,
            deployer: None,
            run: Mutex::new(RunState::default()),
        }
    }

    /// Deploy the bill at close through `system`, if an upload target is configured.
    pub fn with_repository_system(mut self, system: Arc<dyn RepositorySystem>) -> Self {
        self.deployer = ProvisioningDeployer::from_config(system, &self.config);
        self
    }

    pub fn config(&self) -> &FocusConfig {
        &self.config
    }

    pub fn state(&self) -> RecorderState {
        self.lock().state()
    }

    pub fn health(&self) -> ResolutionHealth {
        self.lock().health
    }

    pub fn execution_root(&self) -> Option<Project> {
        self.lock().root.clone()
    }

    pub fn session(&self) -> Option<SessionHandle> {
        self.lock().session.clone()
    }

    /// Number of repository events recorded so far.
    pub fn recorded_events(&self) -> usize {
        self.lock().event_log.len()
    }

    /// Feed one event. Never fails: a bad event is logged and dropped.
    pub fn handle_event(&self, event: BuildEvent) {
        let event_type = event.event_type();
        let mut run = self.lock();
        if run.finalizing {
            tracing::debug!("ignoring {} event after close", event_type);
            return;
        }
        if let Err(e) = self.apply(&mut run, event) {
            tracing::error!("Problem handling {} event: {}", event_type, e);
        }
    }

    fn apply(&self, run: &mut RunState, event: BuildEvent) -> Result<(), RecorderError> {
        match event {
            BuildEvent::Execution(execution) => {
                on_execution(run, execution);
                Ok(())
            }
            BuildEvent::Repository(repository) => {
                self.on_repository(run, repository);
                Ok(())
            }
            BuildEvent::BuildResult(result) => on_build_result(run, result),
            BuildEvent::Settings(settings) => {
                tracing::trace!("settings event {:?}", settings);
                Ok(())
            }
        }
    }

    fn on_repository(&self, run: &mut RunState, event: RepositoryEvent) {
        if !self.config.enabled || run.root.is_none() {
            return;
        }
        if run.session.is_none() {
            run.session = Some(event.session.clone());
        }
        run.event_log.push(event);
    }

    /// End of the reactor run: write the bill and, if configured, deploy it.
    ///
    /// Only a configuration error (unknown upload target) is returned as
    /// `Err`; every other failure is logged and reported in [`CloseReport`].
    pub fn close(&self) -> Result<CloseReport, RecorderError> {
        let (root, events, session, remotes, health) = {
            let mut run = self.lock();
            if run.finalizing {
                tracing::debug!("close called twice; ignoring");
                return Ok(CloseReport::nothing_recorded());
            }
            run.finalizing = true;
            (
                run.root.clone(),
                mem::take(&mut run.event_log),
                run.session.clone(),
                mem::take(&mut run.remote_repositories),
                run.health,
            )
        };

        tracing::info!("Finishing focus recorder (enabled={})", self.config.enabled);
        let Some(root) = root.filter(|_| self.config.enabled) else {
            return Ok(CloseReport::nothing_recorded());
        };

        let bill = BillStore::for_build_output(&root.output_directory);
        let distinct = match bill.record(events.iter().filter_map(|e| e.artifact.as_ref())) {
            Ok(count) => count,
            Err(e) => {
                tracing::error!("Problem writing bill: {}", e);
                return Ok(CloseReport {
                    bill_path: None,
                    distinct_artifacts: 0,
                    deployment: DeploymentStatus::BillUnavailable,
                });
            }
        };

        let deployment = match &self.deployer {
            None => DeploymentStatus::NotRequested,
            Some(deployer) => {
                let input = DeployInput {
                    bill: &bill,
                    health,
                    remote_repositories: &remotes,
                    session: session.as_ref(),
                };
                match deployer.deploy(&input) {
                    Ok(outcome) => DeploymentStatus::Completed(outcome),
                    Err(e) if e.is_configuration() => {
                        tracing::error!("{}", e);
                        return Err(RecorderError::Configuration(e));
                    }
                    Err(e) => {
                        tracing::error!("{}", e);
                        DeploymentStatus::Failed(e.to_string())
                    }
                }
            }
        };

        Ok(CloseReport {
            bill_path: Some(bill.path().to_path_buf()),
            distinct_artifacts: distinct,
            deployment,
        })
    }

    fn lock(&self) -> MutexGuard<'_, RunState> {
        // Append-only state: still consistent after a poisoning panic.
        self.run.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn on_execution(run: &mut RunState, event: ExecutionEvent) {
    let Some(project) = event.project else {
        return;
    };
    if project.execution_root && run.root.is_none() {
        tracing::debug!("execution root identified: {}", project.id);
        run.event_log.clear();
        run.root = Some(project);
    }
}

fn on_build_result(run: &mut RunState, result: BuildResult) -> Result<(), RecorderError> {
    // Health first: a malformed result must not hide a resolution failure.
    let unresolved = result
        .dependency_resolution
        .as_ref()
        .map_or(0, |r| r.unresolved.len());
    if unresolved > 0 {
        tracing::warn!("{} dependencies failed to resolve", unresolved);
        run.health.degrade();
    }

    let project = result.project.ok_or_else(|| {
        RecorderError::EventProcessing("build result carries no project".to_string())
    })?;
    tracing::debug!(
        "build result for {} lists {} remote repositories",
        project.id,
        project.remote_repositories.len()
    );
    run.remote_repositories = project.remote_repositories;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{
        DependencyResolutionResult, ExecutionEventKind, RepositoryEventKind, SettingsEvent,
    };
    use focus_core::ArtifactCoordinate;
    use tempfile::tempdir;

    fn enabled() -> FocusConfig {
        FocusConfig {
            enabled: true,
            ..FocusConfig::default()
        }
    }

    fn root(dir: &std::path::Path) -> Project {
        Project::new("acme:app:1.0", dir.join("target").join("classes")).as_execution_root()
    }

    fn resolved(coord: &str, session: &SessionHandle) -> BuildEvent {
        let coord: ArtifactCoordinate = coord.parse().unwrap();
        BuildEvent::artifact(RepositoryEventKind::ArtifactResolved, coord, session)
    }

    fn result_with_unresolved(unresolved: &[&str]) -> BuildEvent {
        BuildEvent::BuildResult(BuildResult {
            project: Some(Project::new("acme:app:1.0", "/w/target/classes")),
            dependency_resolution: Some(DependencyResolutionResult {
                unresolved: unresolved.iter().map(|c| c.parse().unwrap()).collect(),
            }),
        })
    }

    #[test]
    fn starts_idle_and_tracks_after_root() {
        let dir = tempdir().unwrap();
        let aggregator = BuildEventAggregator::new(enabled());
        assert_eq!(aggregator.state(), RecorderState::Idle);

        aggregator.handle_event(BuildEvent::execution(
            ExecutionEventKind::ProjectStarted,
            Project::new("acme:module:1.0", dir.path().join("m")),
        ));
        assert_eq!(aggregator.state(), RecorderState::Idle);

        aggregator.handle_event(BuildEvent::execution(
            ExecutionEventKind::ProjectStarted,
            root(dir.path()),
        ));
        assert_eq!(aggregator.state(), RecorderState::Tracking);
    }

    #[test]
    fn first_root_wins() {
        let dir = tempdir().unwrap();
        let aggregator = BuildEventAggregator::new(enabled());
        aggregator.handle_event(BuildEvent::execution(
            ExecutionEventKind::ProjectStarted,
            root(dir.path()),
        ));
        let session = SessionHandle::new("s");
        aggregator.handle_event(resolved("a:a:jar:1", &session));

        let mut second = root(dir.path());
        second.id = "acme:other:1.0".into();
        aggregator.handle_event(BuildEvent::execution(
            ExecutionEventKind::ProjectStarted,
            second,
        ));

        assert_eq!(aggregator.execution_root().unwrap().id, "acme:app:1.0");
        assert_eq!(aggregator.recorded_events(), 1);
    }

    #[test]
    fn events_before_root_or_while_disabled_are_dropped() {
        let dir = tempdir().unwrap();
        let session = SessionHandle::new("s");

        let aggregator = BuildEventAggregator::new(enabled());
        aggregator.handle_event(resolved("a:a:jar:1", &session));
        assert_eq!(aggregator.recorded_events(), 0);

        let disabled = BuildEventAggregator::new(FocusConfig::default());
        disabled.handle_event(BuildEvent::execution(
            ExecutionEventKind::ProjectStarted,
            root(dir.path()),
        ));
        disabled.handle_event(resolved("a:a:jar:1", &session));
        assert_eq!(disabled.recorded_events(), 0);
        assert!(disabled.session().is_none());
    }

    #[test]
    fn first_session_is_kept() {
        let dir = tempdir().unwrap();
        let aggregator = BuildEventAggregator::new(enabled());
        aggregator.handle_event(BuildEvent::execution(
            ExecutionEventKind::SessionStarted,
            root(dir.path()),
        ));
        aggregator.handle_event(resolved("a:a:jar:1", &SessionHandle::new("first")));
        aggregator.handle_event(resolved("b:b:jar:1", &SessionHandle::new("second")));

        assert_eq!(aggregator.session().unwrap().as_str(), "first");
    }

    #[test]
    fn health_is_sticky() {
        let aggregator = BuildEventAggregator::new(enabled());
        assert!(aggregator.health().is_healthy());

        aggregator.handle_event(result_with_unresolved(&["x:x:jar:1"]));
        assert_eq!(aggregator.health(), ResolutionHealth::Unhealthy);

        aggregator.handle_event(result_with_unresolved(&[]));
        aggregator.handle_event(BuildEvent::BuildResult(BuildResult {
            project: Some(Project::new("p", "/w/target/classes")),
            dependency_resolution: None,
        }));
        assert_eq!(aggregator.health(), ResolutionHealth::Unhealthy);
    }

    #[test]
    fn absent_resolution_result_counts_as_healthy() {
        let aggregator = BuildEventAggregator::new(enabled());
        aggregator.handle_event(BuildEvent::BuildResult(BuildResult {
            project: Some(Project::new("p", "/w/target/classes")),
            dependency_resolution: None,
        }));
        assert!(aggregator.health().is_healthy());
    }

    #[test]
    fn malformed_result_still_degrades_health_and_keeps_listening() {
        let dir = tempdir().unwrap();
        let aggregator = BuildEventAggregator::new(enabled());
        aggregator.handle_event(BuildEvent::execution(
            ExecutionEventKind::ProjectStarted,
            root(dir.path()),
        ));
        aggregator.handle_event(BuildEvent::BuildResult(BuildResult {
            project: None,
            dependency_resolution: Some(DependencyResolutionResult {
                unresolved: vec!["x:x:jar:1".parse().unwrap()],
            }),
        }));
        assert!(!aggregator.health().is_healthy());

        aggregator.handle_event(resolved("a:a:jar:1", &SessionHandle::new("s")));
        assert_eq!(aggregator.recorded_events(), 1);
    }

    #[test]
    fn settings_events_are_ignored() {
        let aggregator = BuildEventAggregator::new(enabled());
        aggregator.handle_event(BuildEvent::Settings(SettingsEvent::BuildingResult));
        assert_eq!(aggregator.state(), RecorderState::Idle);
    }

    #[test]
    fn close_writes_deduplicated_sorted_bill() {
        let dir = tempdir().unwrap();
        let aggregator = BuildEventAggregator::new(enabled());
        let session = SessionHandle::new("s");
        aggregator.handle_event(BuildEvent::execution(
            ExecutionEventKind::ProjectStarted,
            root(dir.path()),
        ));
        aggregator.handle_event(resolved("com.acme:other:jar:2.0", &session));
        aggregator.handle_event(resolved("com.acme:lib:jar:1.0", &session));
        aggregator.handle_event(resolved("com.acme:lib:jar:1.0", &session));
        aggregator.handle_event(BuildEvent::Repository(RepositoryEvent::new(
            RepositoryEventKind::MetadataResolved,
            session.clone(),
        )));

        let report = aggregator.close().unwrap();
        assert_eq!(report.distinct_artifacts, 2);
        assert_eq!(report.deployment, DeploymentStatus::NotRequested);

        let path = report.bill_path.unwrap();
        assert_eq!(path, dir.path().join("target").join("recording.txt"));
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "com.acme:lib:jar:1.0\ncom.acme:other:jar:2.0\n"
        );
    }

    #[test]
    fn nothing_is_accepted_after_close() {
        let dir = tempdir().unwrap();
        let aggregator = BuildEventAggregator::new(enabled());
        aggregator.handle_event(BuildEvent::execution(
            ExecutionEventKind::ProjectStarted,
            root(dir.path()),
        ));
        aggregator.close().unwrap();
        assert_eq!(aggregator.state(), RecorderState::Finalizing);

        aggregator.handle_event(resolved("a:a:jar:1", &SessionHandle::new("s")));
        aggregator.handle_event(result_with_unresolved(&["x:x:jar:1"]));
        assert_eq!(aggregator.recorded_events(), 0);
        assert!(aggregator.health().is_healthy());

        let again = aggregator.close().unwrap();
        assert!(again.bill_path.is_none());
    }

    #[test]
    fn unwritable_bill_means_no_deployment() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("target");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let aggregator = BuildEventAggregator::new(enabled());
        aggregator.handle_event(BuildEvent::execution(
            ExecutionEventKind::ProjectStarted,
            Project::new("acme:app:1.0", blocker.join("classes")).as_execution_root(),
        ));
        aggregator.handle_event(resolved("a:a:jar:1", &SessionHandle::new("s")));

        let report = aggregator.close().unwrap();
        assert_eq!(report.deployment, DeploymentStatus::BillUnavailable);
        assert!(report.bill_path.is_none());
    }

    #[test]
    fn close_without_root_writes_nothing() {
        let dir = tempdir().unwrap();
        let aggregator = BuildEventAggregator::new(enabled());
        let report = aggregator.close().unwrap();
        assert!(report.bill_path.is_none());
        assert!(!dir.path().join("recording.txt").exists());
    }

    #[test]
    fn concurrent_dispatch_keeps_every_event() {
        let dir = tempdir().unwrap();
        let aggregator = Arc::new(BuildEventAggregator::new(enabled()));
        aggregator.handle_event(BuildEvent::execution(
            ExecutionEventKind::ProjectStarted,
            root(dir.path()),
        ));

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let aggregator = Arc::clone(&aggregator);
                std::thread::spawn(move || {
                    let session = SessionHandle::new(format!("s-{worker}"));
                    for i in 0..50 {
                        aggregator.handle_event(resolved(&format!("g:a{i}:jar:1"), &session));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(aggregator.recorded_events(), 200);
        let report = aggregator.close().unwrap();
        assert_eq!(report.distinct_artifacts, 50);
    }
}
