use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// The reserved name of the sentinel root version.
pub const FIRST_VERSION: &str = "__first_version__";

/// A version name.
///
/// Names are non-empty strings without `/` characters and are unique within a version
/// graph. The name [`FIRST_VERSION`] is reserved for the sentinel root.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display, Serialize, Deserialize)]
#[display("{_0}")]
#[serde(try_from = "String")]
pub struct VersionName(String);

/// An invalid version name.
#[derive(Debug, Error)]
#[error("invalid version name {_0:?}")]
pub struct VersionNameError(String);

impl VersionName {
    /// Create a new version name from `name`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionNameError`] if `name` is empty or contains a `/` character.
    pub fn new(name: impl Into<String>) -> Result<Self, VersionNameError> {
        let name = name.into();
        if name.is_empty() || name.contains('/') {
            Err(VersionNameError(name))
        } else {
            Ok(Self(name))
        }
    }

    /// The sentinel root version: the ancestor of all lineages.
    #[must_use]
    pub fn first() -> Self {
        Self(FIRST_VERSION.to_string())
    }

    /// Returns true if this is the sentinel root version.
    #[must_use]
    pub fn is_first(&self) -> bool {
        self.0 == FIRST_VERSION
    }

    /// Generate a globally unique random version name.
    #[must_use]
    pub fn unique() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Extracts a string slice of the underlying name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for VersionName {
    type Error = VersionNameError;

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}

impl TryFrom<String> for VersionName {
    type Error = VersionNameError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::new(name)
    }
}
