use thiserror::Error;

use crate::{
    storage::StorageError,
    timestamp::{Timestamp, TimestampError},
    version::{VersionName, VersionNameError},
};

/// A [`VersionGraph::create`](crate::graph::VersionGraph::create) error.
#[derive(Debug, Error)]
pub enum GraphCreateError {
    /// A version graph already exists in the store.
    #[error("a version graph already exists in the store")]
    AlreadyExists,
    /// A storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A [`VersionGraph::open`](crate::graph::VersionGraph::open) error.
#[derive(Debug, Error)]
pub enum GraphOpenError {
    /// No version graph exists in the store.
    #[error("no version graph exists in the store")]
    NotFound,
    /// A storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A [`VersionGraph::branch`](crate::graph::VersionGraph::branch) error.
#[derive(Debug, Error)]
pub enum BranchError {
    /// A version with the requested name already exists.
    #[error("version {_0} already exists")]
    AlreadyExists(VersionName),
    /// The requested parent version does not exist.
    #[error("parent version {_0} does not exist")]
    ParentNotFound(VersionName),
    /// The parent version holds an entry of an unrecognized node type.
    #[error("unsupported entry of node type {_0:?} in parent version")]
    UnsupportedEntry(String),
    /// An invalid version name.
    #[error(transparent)]
    InvalidVersionName(#[from] VersionNameError),
    /// A version lookup error.
    #[error(transparent)]
    Index(#[from] VersionIndexError),
    /// A storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// An error looking up or navigating versions in a [`VersionGraph`](crate::graph::VersionGraph).
#[derive(Debug, Error)]
pub enum VersionIndexError {
    /// The named version does not exist.
    #[error("version {_0} does not exist")]
    VersionNotFound(VersionName),
    /// A lineage walk stepped past the root of the lineage.
    #[error("version {version} has fewer than {n} ancestors")]
    LineageExhausted {
        /// The version the walk started from.
        version: VersionName,
        /// The requested number of steps.
        n: u64,
    },
    /// No version was committed at the given timestamp.
    #[error("no version committed at {_0}")]
    TimestampNotFound(Timestamp),
    /// No version was committed at or before the given timestamp.
    #[error("no version committed at or before {_0}")]
    NoVersionBefore(Timestamp),
    /// The current version pointer is unset.
    #[error("the current version pointer is unset")]
    CurrentVersionUnset,
    /// The version holds no dataset entry at the given path.
    #[error("no dataset entry at {path} in version {version}")]
    EntryNotFound {
        /// The version name.
        version: VersionName,
        /// The entry path.
        path: String,
    },
    /// An invalid version name.
    #[error(transparent)]
    InvalidVersionName(#[from] VersionNameError),
    /// An invalid timestamp.
    #[error(transparent)]
    InvalidTimestamp(#[from] TimestampError),
    /// A storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),
}
