// gate.rs — RepositoryGate: rewrite profiles so only one repository is reachable.
//
// Given the configured profiles and a focus repository id:
//
// 1. Find the focus repository (regular or plugin list of any profile).
//    Not found → FocusRepositoryNotConfigured, nothing rewritten.
// 2. Point every other repository at NOOP_URL, keeping id and policies.
// 3. Make sure a "focus" profile declares "central", which the host may add
//    implicitly even when no profile declares it. A "focus" profile the
//    user already has is extended; otherwise a synthetic one is appended.
// 4. Replace all mirrors with one mirror of "*,!<focus>" → focus url, so
//    plugins that insist on some remote still get a working endpoint.
// 5. Activate the synthetic profile.
//
// The result is a fresh value; the caller's profiles are never touched.
// A "focus" profile that already declares "central" is left as step 2
// rewrote it, which makes gating an already gated configuration a no-op.

use focus_core::repository::CENTRAL_ID;
use focus_core::{MirrorRule, Profile, RepositoryDescriptor, RepositoryPolicy};

use crate::error::GateError;

/// Unreachable address non-focus repositories are redirected to.
pub const NOOP_URL: &str = "http://noop";

/// Id of the synthetic profile appended by the gate.
pub const FOCUS_PROFILE_ID: &str = "focus";

/// Id of the single mirror installed by the gate.
pub const FOCUS_MIRROR_ID: &str = "focus";

/// Restricts a configuration to one focus repository.
#[derive(Debug, Clone)]
pub struct RepositoryGate {
    focus_id: String,
}

/// The gate's output: what the build should run with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatedConfiguration {
    /// The focus repository as found in the input, url unchanged.
    pub focus_repository: RepositoryDescriptor,

    /// Rewritten input profiles followed by the synthetic focus profile.
    pub profiles: Vec<Profile>,

    /// Exactly one mirror routing everything except the focus id.
    pub mirrors: Vec<MirrorRule>,

    /// Previously active profiles plus the synthetic one.
    pub active_profiles: Vec<String>,
}

impl RepositoryGate {
    pub fn new(focus_id: impl Into<String>) -> Self {
        Self {
            focus_id: focus_id.into(),
        }
    }

    pub fn focus_id(&self) -> &str {
        &self.focus_id
    }

    /// Rewrite `profiles` so that only the focus repository is reachable.
    pub fn apply(
        &self,
        profiles: &[Profile],
        active_profiles: &[String],
    ) -> Result<GatedConfiguration, GateError> {
        let focus_repository = profiles
            .iter()
            .flat_map(|p| p.all_repositories())
            .find(|r| r.id == self.focus_id)
            .cloned()
            .ok_or_else(|| GateError::FocusRepositoryNotConfigured {
                id: self.focus_id.clone(),
            })?;

        let mut rewritten: Vec<Profile> = profiles
            .iter()
            .map(|profile| {
                tracing::debug!("checking profile {}", profile.id);
                Profile {
                    id: profile.id.clone(),
                    repositories: self.neutralize(&profile.repositories),
                    plugin_repositories: self.neutralize(&profile.plugin_repositories),
                }
            })
            .collect();

        let central = self.central_guard(&focus_repository);
        match rewritten.iter_mut().find(|p| p.id == FOCUS_PROFILE_ID) {
            Some(profile) => {
                tracing::debug!("extending existing profile {}", profile.id);
                declare_once(&mut profile.repositories, &central);
                declare_once(&mut profile.plugin_repositories, &central);
            }
            None => rewritten.push(
                Profile::new(FOCUS_PROFILE_ID)
                    .with_repository(central.clone())
                    .with_plugin_repository(central),
            ),
        }

        let mirror = MirrorRule::new(
            FOCUS_MIRROR_ID,
            format!("*,!{}", self.focus_id),
            focus_repository.url.clone(),
        );
        tracing::info!("Set mirror for {} to {}.", mirror.mirror_of, mirror.url);

        let mut active: Vec<String> = active_profiles.to_vec();
        if !active.iter().any(|p| p == FOCUS_PROFILE_ID) {
            active.push(FOCUS_PROFILE_ID.to_string());
        }

        Ok(GatedConfiguration {
            focus_repository,
            profiles: rewritten,
            mirrors: vec![mirror],
            active_profiles: active,
        })
    }

    fn neutralize(&self, repositories: &[RepositoryDescriptor]) -> Vec<RepositoryDescriptor> {
        repositories
            .iter()
            .map(|repo| {
                if repo.id == self.focus_id {
                    repo.clone()
                } else {
                    tracing::info!("Invalidated access for {} to {}.", repo.id, NOOP_URL);
                    repo.with_url(NOOP_URL)
                }
            })
            .collect()
    }

    /// "central" entry for the focus profile so the host's implicit default is
    /// neutralized too. When "central" is itself the focus it keeps its url.
    fn central_guard(&self, focus: &RepositoryDescriptor) -> RepositoryDescriptor {
        let url = if focus.id == CENTRAL_ID {
            focus.url.clone()
        } else {
            NOOP_URL.to_string()
        };
        RepositoryDescriptor {
            id: CENTRAL_ID.to_string(),
            url,
            releases: RepositoryPolicy::enabled(),
            snapshots: RepositoryPolicy::enabled(),
        }
    }
}

/// Append `central` unless a repository with its id is already declared.
fn declare_once(repositories: &mut Vec<RepositoryDescriptor>, central: &RepositoryDescriptor) {
    if !repositories.iter().any(|r| r.id == central.id) {
        repositories.push(central.clone());
    }
}

impl GatedConfiguration {
    /// One line per profile and per repository: active state and final url.
    pub fn overview(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for profile in &self.profiles {
            let state = if self.active_profiles.contains(&profile.id) {
                "Active"
            } else {
                "Inactive"
            };
            lines.push(format!("{} Profile: {}", state, profile.id));
            for repo in &profile.repositories {
                lines.push(format!(
                    "{} Repository {} from profile {} with target: {}",
                    state, repo.id, profile.id, repo.url
                ));
            }
            for repo in &profile.plugin_repositories {
                lines.push(format!(
                    "{} PluginRepository {} from profile {} with target: {}",
                    state, repo.id, profile.id, repo.url
                ));
            }
        }
        lines
    }

    /// Emit [`overview`](Self::overview) through tracing.
    pub fn log_overview(&self) {
        for line in self.overview() {
            tracing::info!("{}", line);
        }
    }

    /// Url a request to `repository_id` ends up at: the first matching
    /// mirror wins, otherwise the repository's own declared url.
    pub fn effective_url(&self, repository_id: &str) -> Option<String> {
        if let Some(mirror) = self.mirrors.iter().find(|m| m.matches(repository_id)) {
            return Some(mirror.url.clone());
        }
        self.profiles
            .iter()
            .flat_map(|p| p.all_repositories())
            .find(|r| r.id == repository_id)
            .map(|r| r.url.clone())
    }
}
