use derive_more::{Display, From};
use thiserror::Error;

/// A store prefix.
///
/// A prefix is either empty (the root) or a `/`-terminated relative path,
/// e.g. `versions/a/tree/`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Display)]
#[display("{_0}")]
pub struct StorePrefix(String);

/// An invalid store prefix.
#[derive(Debug, From, Error)]
#[error("invalid store prefix {_0}")]
pub struct StorePrefixError(String);

impl StorePrefix {
    /// Create a new store prefix from `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`StorePrefixError`] if `prefix` is not valid according to
    /// [`StorePrefix::validate()`].
    pub fn new(prefix: impl Into<String>) -> Result<Self, StorePrefixError> {
        let prefix = prefix.into();
        if Self::validate(&prefix) {
            Ok(Self(prefix))
        } else {
            Err(StorePrefixError(prefix))
        }
    }

    /// The root prefix, under which every key lies.
    #[must_use]
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Extracts a string slice of the underlying prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validates a prefix.
    ///
    /// A prefix is either an empty string or a string ending in a `/` character which
    /// does not start with `/` and has no empty components (a `//` substring).
    #[must_use]
    pub fn validate(prefix: &str) -> bool {
        prefix.is_empty()
            || (prefix.ends_with('/') && !prefix.starts_with('/') && !prefix.contains("//"))
    }
}

impl TryFrom<&str> for StorePrefix {
    type Error = StorePrefixError;

    fn try_from(prefix: &str) -> Result<Self, Self::Error> {
        Self::new(prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_prefix_validation() {
        assert!(StorePrefix::new("").is_ok());
        assert!(StorePrefix::new("a/").is_ok());
        assert!(StorePrefix::new("a/b/").is_ok());
        assert!(StorePrefix::new("a").is_err());
        assert!(StorePrefix::new("/a/").is_err());
        assert!(StorePrefix::new("a//b/").is_err());
        assert_eq!(StorePrefix::root().as_str(), "");
    }
}
