// repository.rs — The settings slice that repository gating works on.
//
// These mirror the host's profile/repository/mirror model closely enough
// to express the gate's rewrites, and nothing more. They are plain values:
// the gate copies them and returns a rewritten set instead of mutating the
// caller's configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Repository id the host treats as its built-in default remote.
pub const CENTRAL_ID: &str = "central";

/// Repository id reserved for the local artifact cache in `mirrorOf` patterns.
const LOCAL_ID: &str = "local";

/// Release or snapshot policy of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryPolicy {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Update policy such as "daily", "always" or "never".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update_policy: Option<String>,
}

impl Default for RepositoryPolicy {
    fn default() -> Self {
        Self::enabled()
    }
}

impl RepositoryPolicy {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            update_policy: None,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            update_policy: None,
        }
    }
}

fn default_enabled() -> bool {
    true
}

/// A remote repository declaration: id, url and policies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryDescriptor {
    /// Unique repository id (e.g. "central", "corp-releases").
    pub id: String,

    /// Base url of the repository.
    pub url: String,

    #[serde(default)]
    pub releases: RepositoryPolicy,

    #[serde(default)]
    pub snapshots: RepositoryPolicy,
}

impl RepositoryDescriptor {
    /// A repository with releases and snapshots both enabled.
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            releases: RepositoryPolicy::enabled(),
            snapshots: RepositoryPolicy::enabled(),
        }
    }

    /// Copy of this descriptor pointing somewhere else. Id and policies are kept.
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..self.clone()
        }
    }
}

/// A settings profile grouping repositories and plugin repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: String,

    #[serde(default)]
    pub repositories: Vec<RepositoryDescriptor>,

    #[serde(default)]
    pub plugin_repositories: Vec<RepositoryDescriptor>,
}

impl Profile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn with_repository(mut self, repository: RepositoryDescriptor) -> Self {
        self.repositories.push(repository);
        self
    }

    pub fn with_plugin_repository(mut self, repository: RepositoryDescriptor) -> Self {
        self.plugin_repositories.push(repository);
        self
    }

    /// All declared repositories, regular ones first.
    pub fn all_repositories(&self) -> impl Iterator<Item = &RepositoryDescriptor> {
        self.repositories.iter().chain(self.plugin_repositories.iter())
    }
}

/// A mirror redirecting matching repository ids to another url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MirrorRule {
    pub id: String,

    /// Repository-id matcher, e.g. `*`, `central`, `*,!corp`, `external:*`.
    pub mirror_of: String,

    pub url: String,
}

impl MirrorRule {
    pub fn new(
        id: impl Into<String>,
        mirror_of: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            mirror_of: mirror_of.into(),
            url: url.into(),
        }
    }

    /// Whether requests to `repository_id` are routed through this mirror.
    ///
    /// Tokens are comma separated. `!id` excludes and always wins, `*`
    /// matches any id, `external:*` matches any id except `local`, anything
    /// else is an exact id match.
    pub fn matches(&self, repository_id: &str) -> bool {
        let mut matched = false;
        for token in self.mirror_of.split(',').map(str::trim) {
            if let Some(excluded) = token.strip_prefix('!') {
                if excluded == repository_id {
                    return false;
                }
            } else if token == "*"
                || (token == "external:*" && repository_id != LOCAL_ID)
                || token == repository_id
            {
                matched = true;
            }
        }
        matched
    }
}

/// The per-build configuration a configuration processor works on.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRequest {
    #[serde(default)]
    pub profiles: Vec<Profile>,

    #[serde(default)]
    pub mirrors: Vec<MirrorRule>,

    #[serde(default)]
    pub active_profiles: Vec<String>,

    /// `-Dkey=value` style user properties.
    #[serde(default)]
    pub user_properties: BTreeMap<String, String>,
}

impl ExecutionRequest {
    /// Activate a profile id unless it is already active.
    pub fn add_active_profile(&mut self, id: &str) {
        if !self.active_profiles.iter().any(|p| p == id) {
            self.active_profiles.push(id.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wildcard_with_exclusion_skips_only_excluded_id() {
        let mirror = MirrorRule::new("focus", "*,!corp", "https://repo.corp/maven");
        assert!(mirror.matches("central"));
        assert!(mirror.matches("snapshots"));
        assert!(!mirror.matches("corp"));
    }

    #[test]
    fn exclusion_wins_regardless_of_order() {
        let mirror = MirrorRule::new("m", "!corp,*", "https://x");
        assert!(!mirror.matches("corp"));
        assert!(mirror.matches("other"));
    }

    #[test]
    fn external_wildcard_skips_local() {
        let mirror = MirrorRule::new("m", "external:*", "https://x");
        assert!(mirror.matches("central"));
        assert!(!mirror.matches("local"));
    }

    #[test]
    fn exact_ids_match_only_themselves() {
        let mirror = MirrorRule::new("m", "central, jboss", "https://x");
        assert!(mirror.matches("central"));
        assert!(mirror.matches("jboss"));
        assert!(!mirror.matches("corp"));
    }

    #[test]
    fn with_url_keeps_id_and_policies() {
        let mut repo = RepositoryDescriptor::new("snap", "https://snap.example");
        repo.releases = RepositoryPolicy::disabled();
        let moved = repo.with_url("http://noop");
        assert_eq!(moved.id, "snap");
        assert_eq!(moved.url, "http://noop");
        assert!(!moved.releases.enabled);
        assert!(moved.snapshots.enabled);
    }

    #[test]
    fn add_active_profile_is_idempotent() {
        let mut request = ExecutionRequest::default();
        request.add_active_profile("focus");
        request.add_active_profile("focus");
        assert_eq!(request.active_profiles, vec!["focus".to_string()]);
    }
}
