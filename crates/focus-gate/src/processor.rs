//! Delegate-then-augment configuration processing.

use focus_core::{ExecutionRequest, FocusConfig};

use crate::error::GateError;
use crate::gate::RepositoryGate;

/// The host's configuration step: turns settings into an execution request.
///
/// The host's default implementation loads settings files; Repo Focus wraps
/// it and rewrites the outcome.
pub trait ConfigurationProcessor: Send + Sync {
    /// Populate or adjust `request`.
    fn process(&self, request: &mut ExecutionRequest) -> Result<(), GateError>;

    /// Processor display name (for logs).
    fn name(&self) -> &str;
}

/// Runs the host's processor, then applies the [`RepositoryGate`] when
/// `focus_repo` is configured.
pub struct FocusConfigurationProcessor<P: ConfigurationProcessor> {
    delegate: P,
    config: FocusConfig,
}

impl<P: ConfigurationProcessor> FocusConfigurationProcessor<P> {
    pub fn new(delegate: P, config: FocusConfig) -> Self {
        Self { delegate, config }
    }

    pub fn config(&self) -> &FocusConfig {
        &self.config
    }
}

impl<P: ConfigurationProcessor> ConfigurationProcessor for FocusConfigurationProcessor<P> {
    fn process(&self, request: &mut ExecutionRequest) -> Result<(), GateError> {
        self.delegate.process(request)?;

        let Some(focus_id) = self.config.focus_repo.as_deref() else {
            tracing::info!("Focus mode is disabled.");
            return Ok(());
        };

        tracing::info!("Focus mode is enabled.");
        let gated = RepositoryGate::new(focus_id).apply(&request.profiles, &request.active_profiles)?;
        gated.log_overview();

        request.profiles = gated.profiles;
        request.mirrors = gated.mirrors;
        request.active_profiles = gated.active_profiles;
        Ok(())
    }

    fn name(&self) -> &str {
        "focus"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::{FOCUS_PROFILE_ID, NOOP_URL};
    use focus_core::{MirrorRule, Profile, RepositoryDescriptor};

    /// Stands in for the host's settings loader.
    struct SettingsLoader {
        profiles: Vec<Profile>,
        fail: bool,
    }

    impl ConfigurationProcessor for SettingsLoader {
        fn process(&self, request: &mut ExecutionRequest) -> Result<(), GateError> {
            if self.fail {
                return Err(GateError::Delegate("settings.xml unreadable".into()));
            }
            request.profiles = self.profiles.clone();
            request.mirrors = vec![MirrorRule::new("old", "*", "https://old.mirror")];
            Ok(())
        }

        fn name(&self) -> &str {
            "settings"
        }
    }

    fn loader() -> SettingsLoader {
        SettingsLoader {
            profiles: vec![Profile::new("corp")
                .with_repository(RepositoryDescriptor::new("corp", "https://repo.corp"))
                .with_repository(RepositoryDescriptor::new("other", "https://other"))],
            fail: false,
        }
    }

    fn focus_on(id: &str) -> FocusConfig {
        FocusConfig {
            focus_repo: Some(id.to_string()),
            ..FocusConfig::default()
        }
    }

    #[test]
    fn gate_runs_after_delegate() {
        let processor = FocusConfigurationProcessor::new(loader(), focus_on("corp"));
        let mut request = ExecutionRequest::default();
        processor.process(&mut request).unwrap();

        assert_eq!(request.mirrors.len(), 1);
        assert_eq!(request.mirrors[0].url, "https://repo.corp");
        assert_eq!(request.profiles[0].repositories[1].url, NOOP_URL);
        assert!(request.active_profiles.contains(&FOCUS_PROFILE_ID.to_string()));
    }

    #[test]
    fn disabled_leaves_delegate_output_alone() {
        let processor = FocusConfigurationProcessor::new(loader(), FocusConfig::default());
        let mut request = ExecutionRequest::default();
        processor.process(&mut request).unwrap();

        assert_eq!(request.mirrors[0].id, "old");
        assert_eq!(request.profiles.len(), 1);
        assert!(request.active_profiles.is_empty());
    }

    #[test]
    fn unknown_focus_aborts_and_keeps_request() {
        let processor = FocusConfigurationProcessor::new(loader(), focus_on("missing"));
        let mut request = ExecutionRequest::default();
        let err = processor.process(&mut request).unwrap_err();

        assert!(err.to_string().contains("missing"));
        assert_eq!(request.profiles[0].repositories[1].url, "https://other");
        assert_eq!(request.mirrors[0].id, "old");
    }

    #[test]
    fn delegate_failure_propagates() {
        let mut failing = loader();
        failing.fail = true;
        let processor = FocusConfigurationProcessor::new(failing, focus_on("corp"));
        let mut request = ExecutionRequest::default();

        assert!(matches!(
            processor.process(&mut request),
            Err(GateError::Delegate(_))
        ));
    }
}
