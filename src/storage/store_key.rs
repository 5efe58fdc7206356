use derive_more::{Display, From};
use thiserror::Error;

use super::StorePrefix;

/// A store key.
///
/// Keys are `/`-separated relative paths, e.g. `versions/a/version.json`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
#[display("{_0}")]
pub struct StoreKey(String);

/// An invalid store key.
#[derive(Debug, From, Error)]
#[error("invalid store key {_0}")]
pub struct StoreKeyError(String);

/// A list of [`StoreKey`].
pub type StoreKeys = Vec<StoreKey>;

impl StoreKey {
    /// Create a new store key from `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreKeyError`] if `key` is not valid according to [`StoreKey::validate()`].
    pub fn new(key: impl Into<String>) -> Result<Self, StoreKeyError> {
        let key = key.into();
        if Self::validate(&key) {
            Ok(Self(key))
        } else {
            Err(StoreKeyError(key))
        }
    }

    /// Extracts a string slice of the underlying key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates a key.
    ///
    /// A key is a non-empty string which does not start or end with a `/` character
    /// and has no empty components (a `//` substring).
    #[must_use]
    pub fn validate(key: &str) -> bool {
        !key.is_empty() && !key.starts_with('/') && !key.ends_with('/') && !key.contains("//")
    }

    /// Returns true if the key is under `prefix`.
    #[must_use]
    pub fn has_prefix(&self, prefix: &StorePrefix) -> bool {
        self.0.starts_with(prefix.as_str())
    }
}

impl TryFrom<&str> for StoreKey {
    type Error = StoreKeyError;

    fn try_from(key: &str) -> Result<Self, Self::Error> {
        Self::new(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_key_validation() {
        assert!(StoreKey::new("a").is_ok());
        assert!(StoreKey::new("a/b").is_ok());
        assert_eq!(StoreKey::new("a/b").unwrap().to_string(), "a/b");
        assert!(StoreKey::new("").is_err());
        assert!(StoreKey::new("/a").is_err());
        assert!(StoreKey::new("a/").is_err());
        assert!(StoreKey::new("a//b").is_err());
        assert_eq!(
            StoreKey::new("a/").unwrap_err().to_string(),
            "invalid store key a/"
        );
    }

    #[test]
    fn store_key_prefix() {
        let key = StoreKey::new("a/b/c").unwrap();
        assert!(key.has_prefix(&StorePrefix::new("a/b/").unwrap()));
        assert!(key.has_prefix(&StorePrefix::root()));
        assert!(!key.has_prefix(&StorePrefix::new("b/").unwrap()));
    }
}
