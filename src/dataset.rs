//! Dataset entries and staged updates.
//!
//! A version holds a tree of dataset entries. The commit protocol accepts new data for
//! an entry in one of three forms, modelled by [`UpdateData`]:
//!  - a [`DenseArray`] to store wholesale,
//!  - a [`ChunkMap`]: chunk-wise updates, each either new bytes or a reference to a raw
//!    chunk already in the pool, or
//!  - a sparse placeholder with a shape but no initial backing chunks.
//!
//! A [`DatasetUpdate`] pairs the data with the attribute map and fill value that a
//! staging wrapper may carry; plain arrays convert with empty attributes and no fill
//! value.

mod data_type;
mod dense_array;
mod entry_subset;
mod fill_value;
mod slice_descriptor;

use std::collections::BTreeMap;

pub use self::{
    data_type::DataType,
    dense_array::{DenseArray, InvalidBytesLengthError},
    entry_subset::{EntrySubset, IncompatibleDimensionalityError},
    fill_value::FillValue,
    slice_descriptor::SliceDescriptor,
};

/// Dataset attributes: a string-keyed JSON map.
pub type Attributes = serde_json::Map<String, serde_json::Value>;

/// The shape of a dataset entry or chunk: the size of each dimension.
pub type ArrayShape = Vec<u64>;

/// The indices of a chunk within a dataset entry's chunk grid.
pub type ChunkIndices = Vec<u64>;

/// New or reused content for one chunk of a staged dataset entry.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum ChunkSource {
    /// New chunk bytes, exactly one raw chunk in length.
    Data(Vec<u8>),
    /// A reference to raw chunk `n` already stored in the pool for this entry.
    Raw(u64),
}

/// Chunk-wise updates to a dataset entry, keyed by chunk indices.
pub type ChunkMap = BTreeMap<ChunkIndices, ChunkSource>;

/// The payload of a staged dataset update.
#[derive(Clone, PartialEq, Debug)]
pub enum UpdateData {
    /// A dense array to store wholesale.
    Dense(DenseArray),
    /// Chunk-wise updates into an existing raw dataset.
    Chunks(ChunkMap),
    /// A sparse placeholder: registers the entry with no initial backing chunks.
    Sparse {
        /// The logical shape of the entry.
        shape: ArrayShape,
        /// The element type of the entry.
        data_type: DataType,
    },
}

/// A staged dataset update: the data plus the attribute map and optional fill value.
#[derive(Clone, PartialEq, Debug)]
pub struct DatasetUpdate {
    /// The update payload.
    pub data: UpdateData,
    /// The entry's attribute map.
    pub attributes: Attributes,
    /// The entry's fill value, the default for unwritten regions.
    pub fill_value: Option<FillValue>,
}

impl DatasetUpdate {
    /// Create an update with empty attributes and no fill value.
    #[must_use]
    pub fn new(data: UpdateData) -> Self {
        Self {
            data,
            attributes: Attributes::default(),
            fill_value: None,
        }
    }

    /// Set the attribute map.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    /// Set the fill value.
    #[must_use]
    pub fn with_fill_value(mut self, fill_value: impl Into<FillValue>) -> Self {
        self.fill_value = Some(fill_value.into());
        self
    }
}

impl From<DenseArray> for DatasetUpdate {
    fn from(array: DenseArray) -> Self {
        Self::new(UpdateData::Dense(array))
    }
}

impl From<ChunkMap> for DatasetUpdate {
    fn from(chunks: ChunkMap) -> Self {
        Self::new(UpdateData::Chunks(chunks))
    }
}

/// Staged dataset updates keyed by entry path.
pub type DatasetUpdates = BTreeMap<String, DatasetUpdate>;
