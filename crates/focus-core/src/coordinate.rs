// coordinate.rs — ArtifactCoordinate: canonical artifact identity.
//
// The canonical string is both the external identity of an artifact and the
// record key in a bill. Grammar:
//
//   <group>:<artifact>[:<extension>[:<classifier>]]:<version>
//
// Three segments imply the "jar" extension. Formatting always emits the
// extension, and the classifier only when present, so parse(format(c)) == c.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoordinateError;

/// Extension assumed when a coordinate string omits it.
pub const DEFAULT_EXTENSION: &str = "jar";

/// Immutable identity of one artifact.
///
/// Two coordinates are equal iff their canonical strings are equal, even when
/// a segment built through [`ArtifactCoordinate::new`] contains a ':'.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactCoordinate {
    group: String,
    artifact: String,
    extension: String,
    classifier: Option<String>,
    version: String,
}

impl ArtifactCoordinate {
    /// Build a coordinate without a classifier.
    pub fn new(
        group: impl Into<String>,
        artifact: impl Into<String>,
        extension: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group: group.into(),
            artifact: artifact.into(),
            extension: extension.into(),
            classifier: None,
            version: version.into(),
        }
    }

    /// Attach a classifier (e.g. "sources"). An empty string clears it.
    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        let classifier = classifier.into();
        self.classifier = if classifier.is_empty() {
            None
        } else {
            Some(classifier)
        };
        self
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The `group:artifact:extension:version` form written to access logs.
    ///
    /// Unlike the canonical form this never carries the classifier.
    pub fn access_key(&self) -> String {
        format!(
            "{}:{}:{}:{}",
            self.group, self.artifact, self.extension, self.version
        )
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group, self.artifact, self.extension)?;
        if let Some(classifier) = &self.classifier {
            write!(f, ":{}", classifier)?;
        }
        write!(f, ":{}", self.version)
    }
}

impl PartialEq for ArtifactCoordinate {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl Eq for ArtifactCoordinate {}

impl Hash for ArtifactCoordinate {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_string().hash(state);
    }
}

impl FromStr for ArtifactCoordinate {
    type Err = CoordinateError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let segments: Vec<&str> = input.trim().split(':').collect();
        let (group, artifact, extension, classifier, version) = match segments.as_slice() {
            [g, a, v] => (*g, *a, DEFAULT_EXTENSION, "", *v),
            [g, a, e, v] => (*g, *a, *e, "", *v),
            [g, a, e, c, v] => (*g, *a, *e, *c, *v),
            _ => {
                return Err(CoordinateError::BadFormat {
                    input: input.to_string(),
                })
            }
        };

        for (segment, value) in [
            ("group", group),
            ("artifact", artifact),
            ("extension", extension),
            ("version", version),
        ] {
            if value.is_empty() {
                return Err(CoordinateError::EmptySegment {
                    input: input.to_string(),
                    segment,
                });
            }
        }

        Ok(Self::new(group, artifact, extension, version).with_classifier(classifier))
    }
}

impl TryFrom<String> for ArtifactCoordinate {
    type Error = CoordinateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ArtifactCoordinate> for String {
    fn from(value: ArtifactCoordinate) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_four_segment_form() {
        let c: ArtifactCoordinate = "com.acme:lib:jar:1.0".parse().unwrap();
        assert_eq!(c.group(), "com.acme");
        assert_eq!(c.artifact(), "lib");
        assert_eq!(c.extension(), "jar");
        assert_eq!(c.classifier(), None);
        assert_eq!(c.version(), "1.0");
        assert_eq!(c.to_string(), "com.acme:lib:jar:1.0");
    }

    #[test]
    fn three_segments_default_to_jar() {
        let c: ArtifactCoordinate = "com.acme:lib:1.0".parse().unwrap();
        assert_eq!(c.extension(), "jar");
        assert_eq!(c.to_string(), "com.acme:lib:jar:1.0");
    }

    #[test]
    fn classifier_sits_before_version() {
        let c: ArtifactCoordinate = "com.acme:lib:jar:sources:1.0".parse().unwrap();
        assert_eq!(c.classifier(), Some("sources"));
        assert_eq!(c.to_string(), "com.acme:lib:jar:sources:1.0");
        assert_eq!(c.access_key(), "com.acme:lib:jar:1.0");
    }

    #[test]
    fn empty_classifier_is_dropped() {
        let parsed: ArtifactCoordinate = "com.acme:lib:pom::2.0".parse().unwrap();
        let built = ArtifactCoordinate::new("com.acme", "lib", "pom", "2.0");
        assert_eq!(parsed, built);
        assert_eq!(parsed.to_string(), "com.acme:lib:pom:2.0");
    }

    #[test]
    fn rejects_wrong_segment_counts() {
        assert!(matches!(
            "com.acme:lib".parse::<ArtifactCoordinate>(),
            Err(CoordinateError::BadFormat { .. })
        ));
        assert!(matches!(
            "a:b:c:d:e:f".parse::<ArtifactCoordinate>(),
            Err(CoordinateError::BadFormat { .. })
        ));
    }

    #[test]
    fn rejects_empty_required_segment() {
        let err = ":lib:jar:1.0".parse::<ArtifactCoordinate>().unwrap_err();
        assert_eq!(
            err,
            CoordinateError::EmptySegment {
                input: ":lib:jar:1.0".to_string(),
                segment: "group",
            }
        );
        assert!("com.acme:lib:jar:".parse::<ArtifactCoordinate>().is_err());
    }

    #[test]
    fn serializes_as_canonical_string() {
        let c = ArtifactCoordinate::new("org.example", "core", "pom", "3.1");
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"org.example:core:pom:3.1\"");
        let back: ArtifactCoordinate = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn equality_follows_the_canonical_string() {
        use std::collections::HashSet;

        let built = ArtifactCoordinate::new("a", "b", "c:d", "1");
        let parsed: ArtifactCoordinate = "a:b:c:d:1".parse().unwrap();
        assert_eq!(built.to_string(), parsed.to_string());
        assert_eq!(built, parsed);

        let mut seen = HashSet::new();
        seen.insert(built);
        assert!(!seen.insert(parsed));
        assert_ne!(
            ArtifactCoordinate::new("a", "b", "jar", "1"),
            ArtifactCoordinate::new("a", "b", "jar", "2")
        );
    }
}
