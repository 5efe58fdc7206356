//! The version graph.
//!
//! A [`VersionGraph`] is the root object of a versioned store. It owns the version
//! documents under `versions/`, the per-version entry trees under
//! `versions/<name>/tree/`, and the `versions/current` pointer naming the version
//! readers see by default.
//!
//! Versions form a directed forest: every version records its parent, and every lineage
//! terminates at the sentinel first version, which is created with the graph and never
//! surfaced as a real version. New versions are created with [`VersionGraph::branch`]
//! and made durable with [`VersionGraph::commit`](VersionGraph::commit).
//!
//! ```
//! # use std::sync::Arc;
//! use versioned_arrays::graph::VersionGraph;
//! use versioned_arrays::storage::MemoryStore;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(MemoryStore::new());
//! let graph = VersionGraph::create(store)?;
//! let staged = graph.branch(Some("r0"), None)?;
//! assert_eq!(staged.name().as_str(), "r0");
//! # Ok(())
//! # }
//! ```

mod graph_error;

use std::{collections::BTreeSet, sync::Arc};

pub use self::graph_error::{BranchError, GraphCreateError, GraphOpenError, VersionIndexError};

use crate::{
    storage::{
        get_json, set_json, ReadableListableStorageTraits, ReadableStorageTraits,
        ReadableWritableListableStorageTraits, ReadableWritableStorageTraits, StorageError,
        StoreKey, StorePrefix,
    },
    timestamp::{Timestamp, TimestampValue},
    version::{
        DatasetMetadata, EntryMetadata, StagedVersion, VersionMetadata, VersionName, VersionState,
    },
};

pub(crate) fn current_key() -> Result<StoreKey, StorageError> {
    StoreKey::new("versions/current").map_err(StorageError::from)
}

pub(crate) fn version_metadata_key(version: &VersionName) -> Result<StoreKey, StorageError> {
    StoreKey::new(format!("versions/{version}/version.json")).map_err(StorageError::from)
}

fn version_prefix(version: &VersionName) -> Result<StorePrefix, StorageError> {
    StorePrefix::new(format!("versions/{version}/")).map_err(StorageError::from)
}

fn tree_prefix(version: &VersionName) -> Result<StorePrefix, StorageError> {
    StorePrefix::new(format!("versions/{version}/tree/")).map_err(StorageError::from)
}

pub(crate) fn entry_key(version: &VersionName, path: &str) -> Result<StoreKey, StorageError> {
    StoreKey::new(format!("versions/{version}/tree/{path}/entry.json"))
        .map_err(StorageError::from)
}

fn versions_prefix() -> Result<StorePrefix, StorageError> {
    StorePrefix::new("versions/").map_err(StorageError::from)
}

/// A version graph in a store.
#[derive(Debug)]
pub struct VersionGraph<TStorage: ?Sized> {
    pub(crate) storage: Arc<TStorage>,
}

impl<TStorage: ?Sized + ReadableStorageTraits> VersionGraph<TStorage> {
    /// Open an existing version graph in `storage`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphOpenError::NotFound`] if `storage` holds no version graph.
    pub fn open(storage: Arc<TStorage>) -> Result<Self, GraphOpenError> {
        if storage.get(&current_key()?)?.is_none() {
            return Err(GraphOpenError::NotFound);
        }
        Ok(Self { storage })
    }

    /// The name of the current version.
    ///
    /// # Errors
    ///
    /// Returns [`VersionIndexError::CurrentVersionUnset`] if the current version
    /// pointer is absent from the store.
    pub fn current_version(&self) -> Result<VersionName, VersionIndexError> {
        self.read_current()?
            .ok_or(VersionIndexError::CurrentVersionUnset)
    }

    /// The metadata document of the version named `version_name`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionIndexError::VersionNotFound`] if no such version exists.
    pub fn version_metadata(&self, version_name: &str) -> Result<VersionMetadata, VersionIndexError> {
        let version = VersionName::new(version_name)?;
        self.require_version(&version)
    }

    /// The name of the version `n` steps up the lineage from `version_name`.
    ///
    /// `n = 0` returns the version itself; `n = 1` its parent. Only real ancestors
    /// count: a walk that would land on the sentinel root fails.
    ///
    /// # Errors
    ///
    /// Returns [`VersionIndexError::VersionNotFound`] if a visited version does not
    /// exist, or [`VersionIndexError::LineageExhausted`] if the lineage has fewer than
    /// `n` ancestors.
    pub fn nth_previous_version(
        &self,
        version_name: &str,
        n: u64,
    ) -> Result<VersionName, VersionIndexError> {
        let start = VersionName::new(version_name)?;
        let mut version = start.clone();
        let mut metadata = self.require_version(&version)?;
        for _ in 0..n {
            version = metadata.prev_version.clone();
            if version.is_first() {
                return Err(VersionIndexError::LineageExhausted { version: start, n });
            }
            metadata = self.require_version(&version)?;
        }
        Ok(version)
    }

    /// The composite view of the dataset entry at `path` in the version named
    /// `version_name`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionIndexError::VersionNotFound`] if no such version exists, or
    /// [`VersionIndexError::EntryNotFound`] if the version holds no dataset entry at
    /// `path`.
    pub fn dataset_view(
        &self,
        version_name: &str,
        path: &str,
    ) -> Result<DatasetMetadata, VersionIndexError> {
        let version = VersionName::new(version_name)?;
        self.require_version(&version)?;
        let entry: Option<EntryMetadata> =
            get_json(self.storage.as_ref(), &entry_key(&version, path)?)?;
        match entry {
            Some(EntryMetadata::Dataset(metadata)) => Ok(metadata),
            Some(EntryMetadata::Group) | None => Err(VersionIndexError::EntryNotFound {
                version,
                path: path.to_string(),
            }),
        }
    }

    fn read_current(&self) -> Result<Option<VersionName>, VersionIndexError> {
        match self.storage.get(&current_key()?)? {
            Some(bytes) => {
                let name = String::from_utf8(bytes)
                    .map_err(|err| StorageError::Other(err.to_string()))?;
                Ok(Some(VersionName::new(name)?))
            }
            None => Ok(None),
        }
    }

    pub(crate) fn get_version(
        &self,
        version: &VersionName,
    ) -> Result<Option<VersionMetadata>, StorageError> {
        get_json(self.storage.as_ref(), &version_metadata_key(version)?)
    }

    pub(crate) fn require_version(
        &self,
        version: &VersionName,
    ) -> Result<VersionMetadata, VersionIndexError> {
        self.get_version(version)?
            .ok_or_else(|| VersionIndexError::VersionNotFound(version.clone()))
    }
}

impl<TStorage: ?Sized + ReadableListableStorageTraits> VersionGraph<TStorage> {
    /// The names of all versions in the graph, in lexicographical order.
    ///
    /// Staged versions are included. The sentinel first version is included only if
    /// `include_first` is true.
    ///
    /// # Errors
    ///
    /// Returns a [`VersionIndexError`] if the store fails or holds a malformed
    /// version key.
    pub fn all_versions(&self, include_first: bool) -> Result<Vec<VersionName>, VersionIndexError> {
        Ok(self
            .version_names()?
            .into_iter()
            .filter(|version| include_first || !version.is_first())
            .collect())
    }

    /// The name of a version selected by commit timestamp.
    ///
    /// With `exact` set, returns the version committed at exactly the target
    /// timestamp. Otherwise returns the latest version committed at or before it.
    /// Staged versions have no timestamp and never match.
    ///
    /// # Errors
    ///
    /// Returns [`VersionIndexError::InvalidTimestamp`] if `value` is not an UTC
    /// timestamp, [`VersionIndexError::TimestampNotFound`] if no version matches
    /// exactly, or [`VersionIndexError::NoVersionBefore`] if no version was committed
    /// at or before the target.
    pub fn version_by_timestamp(
        &self,
        value: TimestampValue,
        exact: bool,
    ) -> Result<VersionName, VersionIndexError> {
        let target = Timestamp::try_from(value)?;
        let first = VersionName::first();
        let mut best_timestamp = self.require_version(&first)?.timestamp;
        let mut best = first;
        for version in self.version_names()? {
            if version.is_first() {
                continue;
            }
            let Some(timestamp) = self.require_version(&version)?.timestamp else {
                continue;
            };
            if exact {
                if timestamp == target {
                    return Ok(version);
                }
            } else if timestamp <= target
                && best_timestamp.map_or(true, |best| best < timestamp)
            {
                best = version;
                best_timestamp = Some(timestamp);
            }
        }
        if exact {
            Err(VersionIndexError::TimestampNotFound(target))
        } else if best.is_first() {
            Err(VersionIndexError::NoVersionBefore(target))
        } else {
            Ok(best)
        }
    }

    fn version_names(&self) -> Result<BTreeSet<VersionName>, VersionIndexError> {
        let mut names = BTreeSet::new();
        for key in self.storage.list_prefix(&versions_prefix()?)? {
            let mut components = key.as_str().split('/');
            if let (Some("versions"), Some(name), Some("version.json"), None) = (
                components.next(),
                components.next(),
                components.next(),
                components.next(),
            ) {
                names.insert(VersionName::new(name)?);
            }
        }
        Ok(names)
    }
}

impl<TStorage: ?Sized + ReadableWritableStorageTraits> VersionGraph<TStorage> {
    /// Create a new version graph in `storage`.
    ///
    /// Writes the sentinel first version and points the current version at it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphCreateError::AlreadyExists`] if `storage` already holds a
    /// version graph.
    pub fn create(storage: Arc<TStorage>) -> Result<Self, GraphCreateError> {
        if storage.get(&current_key()?)?.is_some() {
            return Err(GraphCreateError::AlreadyExists);
        }
        let first = VersionName::first();
        let metadata = VersionMetadata {
            prev_version: first.clone(),
            state: VersionState::Committed,
            timestamp: Some(Timestamp::now()),
        };
        set_json(storage.as_ref(), &version_metadata_key(&first)?, &metadata)?;
        storage.set(&current_key()?, first.as_str().as_bytes())?;
        Ok(Self { storage })
    }

    /// Point the current version at the version named `version_name`.
    ///
    /// # Errors
    ///
    /// Returns [`VersionIndexError::VersionNotFound`] if no such version exists.
    pub fn set_current_version(&self, version_name: &str) -> Result<(), VersionIndexError> {
        let version = VersionName::new(version_name)?;
        self.require_version(&version)?;
        self.set_current(&version)?;
        Ok(())
    }

    pub(crate) fn set_current(&self, version: &VersionName) -> Result<(), StorageError> {
        self.storage
            .set(&current_key()?, version.as_str().as_bytes())
    }
}

impl<TStorage: ?Sized + ReadableWritableListableStorageTraits> VersionGraph<TStorage> {
    /// Stage a new version branching off a parent.
    ///
    /// The parent is the version named by `parent`, the sentinel first version if
    /// `parent` is `Some("")`, or the current version if `parent` is [`None`]. A
    /// [`None`] `version_name` generates a unique random name.
    ///
    /// The parent's entry tree is copied into the new version by reference: the entry
    /// documents are duplicated, the raw chunks they point at are shared. The new
    /// version is staged and invisible to readers until
    /// [`commit`](VersionGraph::commit).
    ///
    /// # Errors
    ///
    /// Returns a [`BranchError`] if the name is taken, the parent does not exist, or
    /// the parent holds an entry of an unrecognized node type. All failures leave the
    /// graph untouched.
    pub fn branch(
        &self,
        version_name: Option<&str>,
        parent: Option<&str>,
    ) -> Result<StagedVersion, BranchError> {
        let parent = match parent {
            Some("") => VersionName::first(),
            Some(name) => VersionName::new(name)?,
            None => self.current_version()?,
        };
        if self.get_version(&parent)?.is_none() {
            return Err(BranchError::ParentNotFound(parent));
        }
        let name = match version_name {
            Some(name) => VersionName::new(name)?,
            None => VersionName::unique(),
        };
        if self.get_version(&name)?.is_some() {
            return Err(BranchError::AlreadyExists(name));
        }

        // Validate every parent entry before writing anything.
        let parent_tree = tree_prefix(&parent)?;
        let mut documents = Vec::new();
        for key in self.storage.list_prefix(&parent_tree)? {
            let Some(bytes) = self.storage.get(&key)? else {
                continue;
            };
            let document: serde_json::Value =
                serde_json::from_slice(&bytes).map_err(StorageError::InvalidMetadata)?;
            match document.get("node_type").and_then(serde_json::Value::as_str) {
                Some("group" | "dataset") => {}
                Some(kind) => return Err(BranchError::UnsupportedEntry(kind.to_string())),
                None => return Err(BranchError::UnsupportedEntry("unknown".to_string())),
            }
            let suffix = key.as_str()[parent_tree.as_str().len()..].to_string();
            documents.push((suffix, bytes));
        }

        set_json(
            self.storage.as_ref(),
            &version_metadata_key(&name)?,
            &VersionMetadata::new_staged(parent.clone()),
        )?;
        let child_tree = tree_prefix(&name)?;
        for (suffix, bytes) in documents {
            let key = StoreKey::new(format!("{}{suffix}", child_tree.as_str()))
                .map_err(StorageError::from)?;
            self.storage.set(&key, &bytes)?;
        }
        Ok(StagedVersion::new(name, parent))
    }

    /// Delete the version named `version_name` and repoint the current version.
    ///
    /// The current version pointer is repointed unconditionally, whether or not the
    /// deleted version was current: to the version named by `new_current`, or to the
    /// sentinel first version if `new_current` is [`None`] or `Some("")`. Raw chunks
    /// referenced by the deleted version are not reclaimed.
    ///
    /// # Errors
    ///
    /// Returns [`VersionIndexError::VersionNotFound`] if the version does not exist,
    /// is the sentinel first version, or `new_current` does not name a surviving
    /// version.
    pub fn delete_version(
        &self,
        version_name: &str,
        new_current: Option<&str>,
    ) -> Result<(), VersionIndexError> {
        let version = VersionName::new(version_name)?;
        if version.is_first() || self.get_version(&version)?.is_none() {
            return Err(VersionIndexError::VersionNotFound(version));
        }
        let new_current = match new_current {
            None | Some("") => VersionName::first(),
            Some(name) => VersionName::new(name)?,
        };
        if new_current == version {
            return Err(VersionIndexError::VersionNotFound(new_current));
        }
        self.require_version(&new_current)?;
        self.storage.erase_prefix(&version_prefix(&version)?)?;
        self.set_current(&new_current)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use crate::storage::MemoryStore;
    use crate::version::FIRST_VERSION;

    use super::*;

    #[test]
    fn graph_create_and_open() -> Result<(), Box<dyn Error>> {
        let store = Arc::new(MemoryStore::new());
        assert!(matches!(
            VersionGraph::open(store.clone()),
            Err(GraphOpenError::NotFound)
        ));
        let graph = VersionGraph::create(store.clone())?;
        assert_eq!(graph.current_version()?.as_str(), FIRST_VERSION);
        assert!(matches!(
            VersionGraph::create(store.clone()),
            Err(GraphCreateError::AlreadyExists)
        ));
        VersionGraph::open(store)?;
        Ok(())
    }

    #[test]
    fn graph_branch_parent_checks() -> Result<(), Box<dyn Error>> {
        let store = Arc::new(MemoryStore::new());
        let graph = VersionGraph::create(store)?;
        assert!(matches!(
            graph.branch(Some("r0"), Some("missing")),
            Err(BranchError::ParentNotFound(_))
        ));
        let staged = graph.branch(Some("r0"), Some(""))?;
        assert!(staged.prev_version().is_first());
        assert!(matches!(
            graph.branch(Some("r0"), None),
            Err(BranchError::AlreadyExists(_))
        ));
        Ok(())
    }

    #[test]
    fn graph_branch_generates_unique_names() -> Result<(), Box<dyn Error>> {
        let store = Arc::new(MemoryStore::new());
        let graph = VersionGraph::create(store)?;
        let a = graph.branch(None, None)?;
        let b = graph.branch(None, None)?;
        assert_ne!(a.name(), b.name());
        Ok(())
    }

    #[test]
    fn graph_all_versions_includes_first_on_request() -> Result<(), Box<dyn Error>> {
        let store = Arc::new(MemoryStore::new());
        let graph = VersionGraph::create(store)?;
        graph.branch(Some("r0"), None)?;
        let versions = graph.all_versions(false)?;
        assert_eq!(versions, vec![VersionName::new("r0")?]);
        let versions = graph.all_versions(true)?;
        assert_eq!(versions.len(), 2);
        assert!(versions.contains(&VersionName::first()));
        Ok(())
    }
}
