//! Opaque host repository session.

use std::fmt;

/// Opaque reference to the host's repository session.
///
/// Repo Focus never looks inside it; it is captured from events and handed
/// back to the host on resolve, deploy and local-repository calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionHandle(String);

impl SessionHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
