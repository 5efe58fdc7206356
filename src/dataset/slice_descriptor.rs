use serde::{Deserialize, Serialize};

use super::EntrySubset;

/// Maps one chunk-sized extent of a dataset entry onto a raw chunk in the pool.
///
/// A committed entry is materialized as a set of slice descriptors: enough to
/// reconstruct the entry from the pool's immutable raw chunks without copying them.
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct SliceDescriptor {
    subset: EntrySubset,
    raw_index: u64,
}

impl SliceDescriptor {
    /// Create a new slice descriptor mapping `subset` onto raw chunk `raw_index`.
    #[must_use]
    pub const fn new(subset: EntrySubset, raw_index: u64) -> Self {
        Self { subset, raw_index }
    }

    /// The extent of the slice within the entry.
    #[must_use]
    pub fn subset(&self) -> &EntrySubset {
        &self.subset
    }

    /// The index of the backing raw chunk.
    #[must_use]
    pub fn raw_index(&self) -> u64 {
        self.raw_index
    }
}
