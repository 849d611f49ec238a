//! Recognized `focus.*` options.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Property naming the only repository the build may reach.
pub const PROPERTY_FOCUS_REPO: &str = "focus.repo";

/// Property enabling the build event recorder.
pub const PROPERTY_ENABLED: &str = "focus.enabled";

/// Property overriding the upload target (defaults to `focus.repo`).
pub const PROPERTY_UPLOAD_REPO: &str = "focus.upload";

/// Comma-separated repository ids resolution is restricted to at deploy time.
pub const PROPERTY_ALLOWED_REPOS: &str = "focus.allowed";

/// Configuration handed to the gate, recorder and deployer at construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Id of the single repository left reachable. Enables the gate.
    #[serde(default)]
    pub focus_repo: Option<String>,

    /// Whether repository events are recorded into a bill.
    #[serde(default)]
    pub enabled: bool,

    /// Id of the repository the bill is deployed to.
    #[serde(default)]
    pub upload_repo: Option<String>,

    /// Repository ids allowed as resolve sources during deployment.
    /// Empty means every repository the build could see.
    #[serde(default)]
    pub allowed_repositories: Vec<String>,
}

impl FocusConfig {
    /// Build a config from the host's user properties.
    pub fn from_properties(properties: &BTreeMap<String, String>) -> Self {
        let non_empty = |key: &str| {
            properties
                .get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            focus_repo: non_empty(PROPERTY_FOCUS_REPO),
            enabled: properties
                .get(PROPERTY_ENABLED)
                .is_some_and(|v| is_enabled(v)),
            upload_repo: non_empty(PROPERTY_UPLOAD_REPO),
            allowed_repositories: properties
                .get(PROPERTY_ALLOWED_REPOS)
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }

    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::ParseFailed {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Try to load config, returning the default if the file is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default focus config: {}", e);
                Self::default()
            }
        }
    }

    /// The repository the bill is deployed to, if any.
    pub fn upload_target(&self) -> Option<&str> {
        self.upload_repo.as_deref().or(self.focus_repo.as_deref())
    }
}

/// Boolean-like parsing for `focus.enabled`.
pub fn is_enabled(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "on" | "1"
    )
}
