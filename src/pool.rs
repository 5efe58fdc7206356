//! The chunk pool: physical storage of raw chunks and registration of composite views.
//!
//! Raw array data is stored as immutable fixed-shape chunks under `raw/<path>/chunks/<n>`,
//! described by a [`RawMetadata`] document at `raw/<path>/raw.json`. Chunks are
//! deduplicated by content digest: storing bytes identical to an existing chunk reuses
//! it. Raw chunks are never erased or rewritten, so a chunk written by an aborted commit
//! stays reusable and never corrupts a committed version.
//!
//! The pool operations are free functions over the [`storage`](crate::storage) traits:
//!
//!  - [`write_whole`] stores a dense array chunk-by-chunk and returns the slice
//!    descriptors to reconstruct it.
//!  - [`write_chunks`] stores or reuses chunks per explicit chunk index.
//!  - [`create_view`] registers a version's composite view over a set of slices.
//!
//! The commit protocol ([`VersionGraph::commit`](crate::graph::VersionGraph::commit))
//! drives these; they can also be used directly to pre-populate raw data.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    dataset::{
        ArrayShape, Attributes, ChunkIndices, ChunkMap, ChunkSource, DataType, DenseArray,
        EntrySubset, FillValue, IncompatibleDimensionalityError, SliceDescriptor,
    },
    graph::entry_key,
    storage::{
        get_json, set_json, ReadableStorageTraits, ReadableWritableStorageTraits, StorageError,
        StoreKey,
    },
    version::{DatasetMetadata, EntryMetadata, VersionName},
};

/// The metadata document describing a raw dataset in the pool.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct RawMetadata {
    /// The fixed shape of every raw chunk.
    pub chunk_shape: ArrayShape,
    /// The element type.
    pub data_type: DataType,
    /// The fill value used to pad partial edge chunks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<FillValue>,
    /// The compression codec name, passed through from the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression: Option<String>,
    /// The compression codec options, passed through from the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compression_opts: Option<serde_json::Value>,
    /// The number of raw chunks stored.
    pub num_chunks: u64,
    /// Content digest (blake3, hex) of each stored chunk, for deduplication.
    pub digests: BTreeMap<String, u64>,
}

/// Options for [`write_whole`].
#[derive(Clone, Debug, Default)]
pub struct WriteOptions {
    /// The chunk shape for a raw dataset created by this write. Must match the existing
    /// chunk shape if the raw dataset already exists. If [`None`], an existing chunk
    /// shape is used, or the whole array is stored as a single chunk.
    pub chunk_shape: Option<ArrayShape>,
    /// The compression codec name, recorded but not applied here.
    pub compression: Option<String>,
    /// The compression codec options, recorded but not applied here.
    pub compression_opts: Option<serde_json::Value>,
    /// The fill value used to pad partial edge chunks.
    pub fill_value: Option<FillValue>,
}

/// A chunk pool error.
#[derive(Debug, Error)]
pub enum PoolError {
    /// No raw dataset exists at the path.
    #[error("no raw dataset at {_0}")]
    RawDatasetNotFound(String),
    /// A chunk shape incompatible with the raw dataset or the array.
    #[error("chunk shape {got:?} is incompatible with raw dataset {path} (chunk shape {expected:?})")]
    ChunkShapeMismatch {
        /// The dataset path.
        path: String,
        /// The offending chunk shape.
        got: ArrayShape,
        /// The raw dataset's chunk shape.
        expected: ArrayShape,
    },
    /// A data type mismatch against the raw dataset.
    #[error("data type {got} does not match raw dataset {path} ({expected})")]
    DataTypeMismatch {
        /// The dataset path.
        path: String,
        /// The offending data type.
        got: DataType,
        /// The raw dataset's data type.
        expected: DataType,
    },
    /// Chunk indices with the wrong dimensionality.
    #[error("chunk indices {indices:?} do not match raw dataset {path} of dimensionality {expected}")]
    IncompatibleChunkIndices {
        /// The dataset path.
        path: String,
        /// The offending chunk indices.
        indices: ChunkIndices,
        /// The raw dataset's dimensionality.
        expected: usize,
    },
    /// Chunk bytes whose length does not equal the raw chunk size.
    #[error("chunk data of {got} bytes does not match raw dataset {path} chunk size of {expected} bytes")]
    InvalidChunkBytes {
        /// The dataset path.
        path: String,
        /// The offending byte length.
        got: usize,
        /// The raw chunk size in bytes.
        expected: usize,
    },
    /// A reference to a raw chunk that does not exist.
    #[error("raw chunk {raw_index} does not exist in raw dataset {path}")]
    RawChunkOutOfRange {
        /// The dataset path.
        path: String,
        /// The offending raw chunk index.
        raw_index: u64,
    },
    /// A fill value whose size does not equal the element size.
    #[error("fill value of {got} bytes does not match element size {expected} at {path}")]
    InvalidFillValue {
        /// The dataset path.
        path: String,
        /// The fill value size in bytes.
        got: usize,
        /// The element size in bytes.
        expected: usize,
    },
    /// An incompatible dimensionality.
    #[error(transparent)]
    IncompatibleDimensionality(#[from] IncompatibleDimensionalityError),
    /// A storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

fn raw_metadata_key(path: &str) -> Result<StoreKey, StorageError> {
    StoreKey::new(format!("raw/{path}/raw.json")).map_err(StorageError::from)
}

fn raw_chunk_key(path: &str, raw_index: u64) -> Result<StoreKey, StorageError> {
    StoreKey::new(format!("raw/{path}/chunks/{raw_index}")).map_err(StorageError::from)
}

/// Read the [`RawMetadata`] document of the raw dataset at `path`.
///
/// # Errors
///
/// Returns [`PoolError::RawDatasetNotFound`] if no raw dataset exists at `path`.
pub fn raw_metadata<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    path: &str,
) -> Result<RawMetadata, PoolError> {
    get_json(storage, &raw_metadata_key(path)?)?
        .ok_or_else(|| PoolError::RawDatasetNotFound(path.to_string()))
}

/// The fixed chunk shape of the raw dataset at `path`.
///
/// # Errors
///
/// Returns [`PoolError::RawDatasetNotFound`] if no raw dataset exists at `path`.
pub fn raw_chunk_shape<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    path: &str,
) -> Result<ArrayShape, PoolError> {
    Ok(raw_metadata(storage, path)?.chunk_shape)
}

/// Retrieve the bytes of raw chunk `raw_index` of the raw dataset at `path`.
///
/// # Errors
///
/// Returns [`PoolError::RawChunkOutOfRange`] if the chunk does not exist.
pub fn raw_chunk<TStorage: ?Sized + ReadableStorageTraits>(
    storage: &TStorage,
    path: &str,
    raw_index: u64,
) -> Result<Vec<u8>, PoolError> {
    storage
        .get(&raw_chunk_key(path, raw_index)?)?
        .ok_or(PoolError::RawChunkOutOfRange {
            path: path.to_string(),
            raw_index,
        })
}

/// Physically store the dense `array` at `path`, returning slice descriptors
/// sufficient to reconstruct it.
///
/// Creates the raw dataset if it does not exist, otherwise appends to it. The array is
/// split over the chunk grid; partial edge chunks are padded with the fill value (zeros
/// if unset). Each chunk is deduplicated by content digest against the chunks already
/// stored. An array with no elements registers the raw dataset and returns no slices.
///
/// # Errors
///
/// Returns a [`PoolError`] if the chunk shape or data type is incompatible with an
/// existing raw dataset, the fill value does not match the element size, or the store
/// fails.
pub fn write_whole<TStorage: ?Sized + ReadableWritableStorageTraits>(
    storage: &TStorage,
    path: &str,
    array: &DenseArray,
    options: &WriteOptions,
) -> Result<Vec<SliceDescriptor>, PoolError> {
    let metadata_key = raw_metadata_key(path)?;
    let mut metadata = match get_json::<RawMetadata>(storage, &metadata_key)? {
        Some(metadata) => {
            if metadata.data_type != array.data_type() {
                return Err(PoolError::DataTypeMismatch {
                    path: path.to_string(),
                    got: array.data_type(),
                    expected: metadata.data_type,
                });
            }
            if let Some(chunk_shape) = &options.chunk_shape {
                if *chunk_shape != metadata.chunk_shape {
                    return Err(PoolError::ChunkShapeMismatch {
                        path: path.to_string(),
                        got: chunk_shape.clone(),
                        expected: metadata.chunk_shape.clone(),
                    });
                }
            }
            metadata
        }
        None => RawMetadata {
            chunk_shape: options
                .chunk_shape
                .clone()
                .unwrap_or_else(|| array.shape().to_vec()),
            data_type: array.data_type(),
            fill_value: options.fill_value.clone(),
            compression: options.compression.clone(),
            compression_opts: options.compression_opts.clone(),
            num_chunks: 0,
            digests: BTreeMap::new(),
        },
    };

    let mut slices = Vec::new();
    if array.num_elements() > 0 {
        let chunk_shape = metadata.chunk_shape.clone();
        if chunk_shape.len() != array.shape().len() || chunk_shape.contains(&0) {
            return Err(PoolError::ChunkShapeMismatch {
                path: path.to_string(),
                got: array.shape().to_vec(),
                expected: chunk_shape,
            });
        }
        let fill = fill_bytes(metadata.fill_value.as_ref(), array.data_type().size(), path)?;
        let grid: Vec<u64> = std::iter::zip(array.shape(), &chunk_shape)
            .map(|(&dim, &chunk)| dim.div_ceil(chunk))
            .collect();
        for chunk_indices in cartesian_indices(&grid) {
            let start: Vec<u64> = std::iter::zip(&chunk_indices, &chunk_shape)
                .map(|(index, chunk)| index * chunk)
                .collect();
            let end: Vec<u64> = (0..start.len())
                .map(|d| (start[d] + chunk_shape[d]).min(array.shape()[d]))
                .collect();
            let chunk_bytes = extract_chunk(array, &start, &chunk_shape, &fill);
            let raw_index = store_chunk(storage, path, &mut metadata, chunk_bytes)?;
            slices.push(SliceDescriptor::new(EntrySubset::new(start, end)?, raw_index));
        }
    }
    set_json(storage, &metadata_key, &metadata)?;
    Ok(slices)
}

/// Store or reuse chunks of the raw dataset at `path` per explicit chunk index,
/// returning one slice descriptor per entry of `chunks`.
///
/// The raw dataset must already exist; its chunk shape is fixed and cannot be
/// overridden. [`ChunkSource::Data`] bytes are deduplicated like [`write_whole`]
/// chunks; [`ChunkSource::Raw`] references an existing raw chunk directly.
///
/// # Errors
///
/// Returns a [`PoolError`] if the raw dataset does not exist, chunk indices or bytes
/// are incompatible with it, a raw reference is out of range, or the store fails.
pub fn write_chunks<TStorage: ?Sized + ReadableWritableStorageTraits>(
    storage: &TStorage,
    path: &str,
    chunks: &ChunkMap,
) -> Result<Vec<SliceDescriptor>, PoolError> {
    let metadata_key = raw_metadata_key(path)?;
    let mut metadata = get_json::<RawMetadata>(storage, &metadata_key)?
        .ok_or_else(|| PoolError::RawDatasetNotFound(path.to_string()))?;
    let chunk_shape = metadata.chunk_shape.clone();
    let chunk_elements = chunk_shape.iter().product::<u64>();
    let chunk_size = usize::try_from(chunk_elements).unwrap_or(usize::MAX)
        * metadata.data_type.size();

    let mut slices = Vec::with_capacity(chunks.len());
    for (chunk_indices, source) in chunks {
        if chunk_indices.len() != chunk_shape.len() {
            return Err(PoolError::IncompatibleChunkIndices {
                path: path.to_string(),
                indices: chunk_indices.clone(),
                expected: chunk_shape.len(),
            });
        }
        let raw_index = match source {
            ChunkSource::Data(bytes) => {
                if bytes.len() != chunk_size {
                    return Err(PoolError::InvalidChunkBytes {
                        path: path.to_string(),
                        got: bytes.len(),
                        expected: chunk_size,
                    });
                }
                store_chunk(storage, path, &mut metadata, bytes.clone())?
            }
            ChunkSource::Raw(raw_index) => {
                if *raw_index >= metadata.num_chunks {
                    return Err(PoolError::RawChunkOutOfRange {
                        path: path.to_string(),
                        raw_index: *raw_index,
                    });
                }
                *raw_index
            }
        };
        let start: Vec<u64> = std::iter::zip(chunk_indices, &chunk_shape)
            .map(|(index, chunk)| index * chunk)
            .collect();
        let end: Vec<u64> = std::iter::zip(&start, &chunk_shape)
            .map(|(start, chunk)| start + chunk)
            .collect();
        slices.push(SliceDescriptor::new(EntrySubset::new(start, end)?, raw_index));
    }
    set_json(storage, &metadata_key, &metadata)?;
    Ok(slices)
}

/// Register the composite view of the dataset entry at `path` in version `version`.
///
/// Writes the entry's [`DatasetMetadata`] document and creates container group
/// documents for any missing ancestors of `path`. This is the step that makes the
/// entry addressable under the version without copying chunk bytes.
///
/// # Errors
///
/// Returns a [`PoolError`] if no raw dataset exists at `path` or the store fails.
pub fn create_view<TStorage: ?Sized + ReadableWritableStorageTraits>(
    storage: &TStorage,
    version: &VersionName,
    path: &str,
    shape: ArrayShape,
    slices: Vec<SliceDescriptor>,
    attributes: Attributes,
    fill_value: Option<FillValue>,
) -> Result<(), PoolError> {
    let metadata = raw_metadata(storage, path)?;
    let components: Vec<&str> = path.split('/').collect();
    for depth in 1..components.len() {
        let group_path = components[..depth].join("/");
        let key = entry_key(version, &group_path)?;
        if storage.get(&key)?.is_none() {
            set_json(storage, &key, &EntryMetadata::Group)?;
        }
    }
    let document = EntryMetadata::Dataset(DatasetMetadata {
        shape,
        data_type: metadata.data_type,
        fill_value,
        attributes,
        slices,
    });
    set_json(storage, &entry_key(version, path)?, &document)?;
    Ok(())
}

fn fill_bytes(
    fill_value: Option<&FillValue>,
    element_size: usize,
    path: &str,
) -> Result<Vec<u8>, PoolError> {
    match fill_value {
        Some(fill) if fill.size() == element_size => Ok(fill.as_slice().to_vec()),
        Some(fill) => Err(PoolError::InvalidFillValue {
            path: path.to_string(),
            got: fill.size(),
            expected: element_size,
        }),
        None => Ok(vec![0; element_size]),
    }
}

/// Store `bytes` as a raw chunk, reusing an existing chunk with the same content.
fn store_chunk<TStorage: ?Sized + ReadableWritableStorageTraits>(
    storage: &TStorage,
    path: &str,
    metadata: &mut RawMetadata,
    bytes: Vec<u8>,
) -> Result<u64, PoolError> {
    let digest = blake3::hash(&bytes).to_hex().to_string();
    if let Some(&raw_index) = metadata.digests.get(&digest) {
        return Ok(raw_index);
    }
    let raw_index = metadata.num_chunks;
    storage.set(&raw_chunk_key(path, raw_index)?, &bytes)?;
    metadata.digests.insert(digest, raw_index);
    metadata.num_chunks += 1;
    Ok(raw_index)
}

/// All indices of the grid with the given extents, in row-major order.
fn cartesian_indices(extents: &[u64]) -> Vec<ChunkIndices> {
    if extents.is_empty() {
        vec![Vec::new()]
    } else {
        extents
            .iter()
            .map(|&extent| 0..extent)
            .multi_cartesian_product()
            .collect()
    }
}

fn strides(shape: &[u64]) -> Vec<u64> {
    let mut strides = vec![1; shape.len()];
    for d in (0..shape.len().saturating_sub(1)).rev() {
        strides[d] = strides[d + 1] * shape[d + 1];
    }
    strides
}

/// Extract the chunk of `array` starting at `start` as a full `chunk_shape` of bytes,
/// padding out-of-bounds regions with `fill`.
fn extract_chunk(array: &DenseArray, start: &[u64], chunk_shape: &[u64], fill: &[u8]) -> Vec<u8> {
    if array.shape().is_empty() {
        // A zero-dimensional array is a single scalar chunk.
        return array.bytes().to_vec();
    }
    let element_size = array.data_type().size();
    let chunk_elements = chunk_shape.iter().product::<u64>();
    let mut bytes = Vec::with_capacity(
        usize::try_from(chunk_elements).unwrap_or(usize::MAX) * element_size,
    );
    for _ in 0..chunk_elements {
        bytes.extend_from_slice(fill);
    }

    let ndim = array.shape().len();
    let extent: Vec<u64> = (0..ndim)
        .map(|d| chunk_shape[d].min(array.shape()[d] - start[d]))
        .collect();
    if extent.iter().any(|&e| e == 0) {
        return bytes;
    }
    let array_strides = strides(array.shape());
    let chunk_strides = strides(chunk_shape);
    let row_len = usize::try_from(extent[ndim - 1]).unwrap_or(usize::MAX) * element_size;
    for index in cartesian_indices(&extent[..ndim - 1]) {
        let mut src_element = start[ndim - 1];
        let mut dst_element = 0;
        for d in 0..ndim - 1 {
            src_element += (start[d] + index[d]) * array_strides[d];
            dst_element += index[d] * chunk_strides[d];
        }
        let src = usize::try_from(src_element).unwrap_or(usize::MAX) * element_size;
        let dst = usize::try_from(dst_element).unwrap_or(usize::MAX) * element_size;
        bytes[dst..dst + row_len].copy_from_slice(&array.bytes()[src..src + row_len]);
    }
    bytes
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use crate::storage::MemoryStore;

    use super::*;

    fn int32_array(shape: ArrayShape, elements: &[i32]) -> DenseArray {
        DenseArray::from_elements(shape, DataType::Int32, elements).unwrap()
    }

    #[test]
    fn write_whole_single_chunk() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let array = int32_array(vec![2, 3], &[0, 1, 2, 3, 4, 5]);
        let slices = write_whole(&store, "data", &array, &WriteOptions::default())?;
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].subset().start(), &[0, 0]);
        assert_eq!(slices[0].subset().end(), &[2, 3]);
        let metadata = raw_metadata(&store, "data")?;
        assert_eq!(metadata.chunk_shape, vec![2, 3]);
        assert_eq!(metadata.num_chunks, 1);
        Ok(())
    }

    #[test]
    fn write_whole_pads_edge_chunks() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let array = int32_array(vec![3, 3], &[0, 1, 2, 3, 4, 5, 6, 7, 8]);
        let options = WriteOptions {
            chunk_shape: Some(vec![2, 2]),
            fill_value: Some(9i32.into()),
            ..WriteOptions::default()
        };
        let slices = write_whole(&store, "data", &array, &options)?;
        assert_eq!(slices.len(), 4);
        // The top-right chunk covers [0,2)x[2,3): column 2 of rows 0-1, padded.
        assert_eq!(slices[1].subset().start(), &[0, 2]);
        assert_eq!(slices[1].subset().end(), &[2, 3]);
        let bytes = raw_chunk(&store, "data", slices[1].raw_index())?;
        let elements: &[i32] = bytemuck::cast_slice(&bytes);
        assert_eq!(elements, &[2, 9, 5, 9]);
        // The bottom-right chunk covers the single element [2,2].
        let bytes = raw_chunk(&store, "data", slices[3].raw_index())?;
        let elements: &[i32] = bytemuck::cast_slice(&bytes);
        assert_eq!(elements, &[8, 9, 9, 9]);
        Ok(())
    }

    #[test]
    fn write_whole_deduplicates_chunks() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let constant = int32_array(vec![4, 4], &[7; 16]);
        let options = WriteOptions {
            chunk_shape: Some(vec![2, 2]),
            ..WriteOptions::default()
        };
        let slices = write_whole(&store, "data", &constant, &options)?;
        assert_eq!(slices.len(), 4);
        // All four chunks have identical content, so only one is stored.
        assert_eq!(raw_metadata(&store, "data")?.num_chunks, 1);
        assert!(slices.iter().all(|slice| slice.raw_index() == 0));

        // Writing the same content again stores nothing new.
        write_whole(&store, "data", &constant, &options)?;
        assert_eq!(raw_metadata(&store, "data")?.num_chunks, 1);
        Ok(())
    }

    #[test]
    fn write_whole_empty_array_registers_raw_dataset() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let slices = write_whole(
            &store,
            "sparse",
            &DenseArray::empty(DataType::Float64),
            &WriteOptions::default(),
        )?;
        assert!(slices.is_empty());
        assert_eq!(raw_metadata(&store, "sparse")?.num_chunks, 0);
        Ok(())
    }

    #[test]
    fn write_whole_rejects_mismatches() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let options = WriteOptions {
            chunk_shape: Some(vec![2]),
            ..WriteOptions::default()
        };
        write_whole(&store, "data", &int32_array(vec![4], &[0, 1, 2, 3]), &options)?;

        let other_shape = WriteOptions {
            chunk_shape: Some(vec![3]),
            ..WriteOptions::default()
        };
        let result = write_whole(
            &store,
            "data",
            &int32_array(vec![4], &[0, 1, 2, 3]),
            &other_shape,
        );
        assert!(matches!(result, Err(PoolError::ChunkShapeMismatch { .. })));

        let wrong_type =
            DenseArray::from_elements(vec![4], DataType::Float64, &[0f64, 1.0, 2.0, 3.0]).unwrap();
        let result = write_whole(&store, "data", &wrong_type, &WriteOptions::default());
        assert!(matches!(result, Err(PoolError::DataTypeMismatch { .. })));
        Ok(())
    }

    #[test]
    fn write_chunks_requires_raw_dataset() {
        let store = MemoryStore::new();
        let result = write_chunks(&store, "missing", &ChunkMap::new());
        assert!(matches!(result, Err(PoolError::RawDatasetNotFound(_))));
    }

    #[test]
    fn write_chunks_validates_sources() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let options = WriteOptions {
            chunk_shape: Some(vec![2, 2]),
            ..WriteOptions::default()
        };
        write_whole(
            &store,
            "data",
            &int32_array(vec![2, 2], &[0, 1, 2, 3]),
            &options,
        )?;

        let bad_dims = ChunkMap::from([(vec![0], ChunkSource::Raw(0))]);
        assert!(matches!(
            write_chunks(&store, "data", &bad_dims),
            Err(PoolError::IncompatibleChunkIndices { .. })
        ));

        let bad_bytes = ChunkMap::from([(vec![0, 0], ChunkSource::Data(vec![0; 4]))]);
        assert!(matches!(
            write_chunks(&store, "data", &bad_bytes),
            Err(PoolError::InvalidChunkBytes { .. })
        ));

        let bad_reference = ChunkMap::from([(vec![0, 0], ChunkSource::Raw(5))]);
        assert!(matches!(
            write_chunks(&store, "data", &bad_reference),
            Err(PoolError::RawChunkOutOfRange { .. })
        ));
        Ok(())
    }

    #[test]
    fn write_chunks_reuses_and_appends() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let options = WriteOptions {
            chunk_shape: Some(vec![2, 2]),
            ..WriteOptions::default()
        };
        write_whole(
            &store,
            "data",
            &int32_array(vec![2, 2], &[0, 1, 2, 3]),
            &options,
        )?;

        let chunks = ChunkMap::from([
            (vec![0, 0], ChunkSource::Raw(0)),
            (
                vec![1, 1],
                ChunkSource::Data(bytemuck::cast_slice(&[9i32, 9, 9, 9]).to_vec()),
            ),
        ]);
        let slices = write_chunks(&store, "data", &chunks)?;
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].raw_index(), 0);
        assert_eq!(slices[0].subset().end(), &[2, 2]);
        assert_eq!(slices[1].raw_index(), 1);
        assert_eq!(slices[1].subset().start(), &[2, 2]);
        assert_eq!(slices[1].subset().end(), &[4, 4]);
        assert_eq!(raw_metadata(&store, "data")?.num_chunks, 2);
        Ok(())
    }
}
