//! Version nodes.
//!
//! A version is a named snapshot of a dataset entry tree. It is mutable while staged
//! and immutable once committed. Every version records its parent, forming a directed
//! forest rooted at the sentinel first version ([`VersionName::first`]), which is never
//! surfaced to callers as a real version.

mod entry_metadata;
mod version_metadata;
mod version_name;

use derive_more::Display;

pub use self::{
    entry_metadata::{DatasetMetadata, EntryMetadata},
    version_metadata::{VersionMetadata, VersionState},
    version_name::{VersionName, VersionNameError, FIRST_VERSION},
};

/// A handle to a version created by [`branch`](crate::graph::VersionGraph::branch) and
/// not yet committed.
///
/// The staged version is invisible to readers and to navigation until it is passed to
/// [`commit`](crate::graph::VersionGraph::commit), which consumes its staged state
/// exactly once. An abandoned staged version is harmless: it is never current and never
/// enumerated as committed; it can be removed with
/// [`delete_version`](crate::graph::VersionGraph::delete_version).
#[derive(Clone, Debug, Display)]
#[display("{name}")]
pub struct StagedVersion {
    name: VersionName,
    prev_version: VersionName,
}

impl StagedVersion {
    pub(crate) fn new(name: VersionName, prev_version: VersionName) -> Self {
        Self { name, prev_version }
    }

    /// The name of the staged version.
    #[must_use]
    pub fn name(&self) -> &VersionName {
        &self.name
    }

    /// The name of the parent version.
    #[must_use]
    pub fn prev_version(&self) -> &VersionName {
        &self.prev_version
    }
}
