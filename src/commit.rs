//! The commit protocol.
//!
//! [`VersionGraph::commit`] turns a staged version into a committed, immutable one. It
//! runs in a fixed order so that every precondition failure leaves the graph exactly as
//! it was:
//!
//!  1. check the version is staged and canonicalize the commit timestamp,
//!  2. reject chunk-shape overrides for chunk-map updates,
//!  3. write each update's chunks into the pool and register its composite view,
//!  4. repoint the current version (unless [`CommitOptions::set_make_current`] says
//!     otherwise),
//!  5. write the version document once, marking it committed with its timestamp.
//!
//! Step 5 is the commit point: a failure before it leaves the version staged, and any
//! chunks already written in step 3 are deduplicated pool chunks that a retry reuses.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::{
    dataset::{ArrayShape, DatasetUpdates, DenseArray, UpdateData},
    graph::{version_metadata_key, VersionGraph},
    pool::{self, PoolError, WriteOptions},
    storage::{set_json, ReadableWritableListableStorageTraits, StorageError},
    timestamp::{Timestamp, TimestampError, TimestampValue},
    version::{StagedVersion, VersionMetadata, VersionName, VersionState},
};

/// Options for [`VersionGraph::commit`].
#[derive(Clone, Debug)]
pub struct CommitOptions {
    make_current: bool,
    chunk_shapes: BTreeMap<String, ArrayShape>,
    compression: BTreeMap<String, String>,
    compression_opts: BTreeMap<String, serde_json::Value>,
    timestamp: Option<TimestampValue>,
}

impl Default for CommitOptions {
    fn default() -> Self {
        Self {
            make_current: true,
            chunk_shapes: BTreeMap::default(),
            compression: BTreeMap::default(),
            compression_opts: BTreeMap::default(),
            timestamp: None,
        }
    }
}

impl CommitOptions {
    /// Whether the committed version becomes the current version. Default `true`.
    #[must_use]
    pub fn make_current(&self) -> bool {
        self.make_current
    }

    /// Set whether the committed version becomes the current version.
    pub fn set_make_current(&mut self, make_current: bool) -> &mut Self {
        self.make_current = make_current;
        self
    }

    /// The chunk shape override for the entry at `path`.
    #[must_use]
    pub fn chunk_shape(&self, path: &str) -> Option<&ArrayShape> {
        self.chunk_shapes.get(path)
    }

    /// Set the chunk shape for a raw dataset created by this commit. Rejected for
    /// chunk-map updates and for raw datasets that already exist with another shape.
    pub fn set_chunk_shape(&mut self, path: impl Into<String>, chunk_shape: ArrayShape) -> &mut Self {
        self.chunk_shapes.insert(path.into(), chunk_shape);
        self
    }

    /// The compression codec name for the entry at `path`.
    #[must_use]
    pub fn compression(&self, path: &str) -> Option<&String> {
        self.compression.get(path)
    }

    /// Set the compression codec name recorded for a raw dataset created by this
    /// commit.
    pub fn set_compression(&mut self, path: impl Into<String>, compression: impl Into<String>) -> &mut Self {
        self.compression.insert(path.into(), compression.into());
        self
    }

    /// The compression codec options for the entry at `path`.
    #[must_use]
    pub fn compression_opts(&self, path: &str) -> Option<&serde_json::Value> {
        self.compression_opts.get(path)
    }

    /// Set the compression codec options recorded for a raw dataset created by this
    /// commit.
    pub fn set_compression_opts(&mut self, path: impl Into<String>, opts: serde_json::Value) -> &mut Self {
        self.compression_opts.insert(path.into(), opts);
        self
    }

    /// The explicit commit timestamp, if any.
    #[must_use]
    pub fn timestamp(&self) -> Option<&TimestampValue> {
        self.timestamp.as_ref()
    }

    /// Set an explicit commit timestamp. Defaults to the current time, truncated to
    /// microseconds.
    pub fn set_timestamp(&mut self, timestamp: TimestampValue) -> &mut Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// A [`VersionGraph::commit`] error.
#[derive(Debug, Error)]
pub enum CommitError {
    /// The version is not staged in the graph.
    #[error("version {_0} is not staged")]
    NotStaged(VersionName),
    /// The version has already been committed.
    #[error("version {_0} has already been committed")]
    AlreadyCommitted(VersionName),
    /// A chunk shape override for a chunk-map update.
    #[error("chunk shape override for chunk-map update at {_0}")]
    ChunkShapeOverride(String),
    /// An invalid commit timestamp.
    #[error(transparent)]
    InvalidTimestamp(#[from] TimestampError),
    /// A chunk pool error.
    #[error(transparent)]
    Pool(#[from] PoolError),
    /// A storage error.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl<TStorage: ?Sized + ReadableWritableListableStorageTraits> VersionGraph<TStorage> {
    /// Commit a staged version, making it durable and immutable.
    ///
    /// Each entry of `updates` is written into the pool and registered as a composite
    /// view in the version. Entries inherited from the parent at
    /// [`branch`](VersionGraph::branch) time and not named in `updates` are kept as
    /// they are. The version becomes current unless
    /// [`CommitOptions::set_make_current`] disables it, and its single version
    /// document write marks it committed.
    ///
    /// # Errors
    ///
    /// Returns a [`CommitError`] if the version is not staged or already committed,
    /// the timestamp is not UTC, an update conflicts with the pool, or the store
    /// fails. No precondition failure mutates the graph; a pool failure mid-write can
    /// leave reusable chunks behind but never a committed version.
    pub fn commit(
        &self,
        staged: &StagedVersion,
        updates: &DatasetUpdates,
        options: &CommitOptions,
    ) -> Result<(), CommitError> {
        let Some(metadata) = self.get_version(staged.name())? else {
            return Err(CommitError::NotStaged(staged.name().clone()));
        };
        if metadata.is_committed() {
            return Err(CommitError::AlreadyCommitted(staged.name().clone()));
        }
        let timestamp = match options.timestamp() {
            Some(value) => Timestamp::try_from(*value)?,
            None => Timestamp::now(),
        };
        for (path, update) in updates {
            if matches!(update.data, UpdateData::Chunks(_)) && options.chunk_shape(path).is_some()
            {
                return Err(CommitError::ChunkShapeOverride(path.clone()));
            }
        }

        for (path, update) in updates {
            let mut write_options = WriteOptions {
                chunk_shape: options.chunk_shape(path).cloned(),
                compression: options.compression(path).cloned(),
                compression_opts: options.compression_opts(path).cloned(),
                fill_value: update.fill_value.clone(),
            };
            let (shape, slices) = match &update.data {
                UpdateData::Dense(array) => {
                    let slices =
                        pool::write_whole(self.storage.as_ref(), path, array, &write_options)?;
                    (array.shape().to_vec(), slices)
                }
                UpdateData::Chunks(chunks) => {
                    let slices = pool::write_chunks(self.storage.as_ref(), path, chunks)?;
                    // The logical shape covers every written chunk.
                    let dimensionality =
                        pool::raw_chunk_shape(self.storage.as_ref(), path)?.len();
                    let mut shape = vec![0; dimensionality];
                    for slice in &slices {
                        for (dim, &end) in slice.subset().end().iter().enumerate() {
                            shape[dim] = shape[dim].max(end);
                        }
                    }
                    (shape, slices)
                }
                UpdateData::Sparse { shape, data_type } => {
                    // A new sparse entry's raw dataset defaults to whole-entry chunks.
                    if write_options.chunk_shape.is_none()
                        && pool::raw_metadata(self.storage.as_ref(), path).is_err()
                    {
                        write_options.chunk_shape = Some(shape.clone());
                    }
                    let slices = pool::write_whole(
                        self.storage.as_ref(),
                        path,
                        &DenseArray::empty(*data_type),
                        &write_options,
                    )?;
                    (shape.clone(), slices)
                }
            };
            pool::create_view(
                self.storage.as_ref(),
                staged.name(),
                path,
                shape,
                slices,
                update.attributes.clone(),
                update.fill_value.clone(),
            )?;
        }

        if options.make_current() {
            self.set_current(staged.name())?;
        }
        let committed = VersionMetadata {
            prev_version: metadata.prev_version,
            state: VersionState::Committed,
            timestamp: Some(timestamp),
        };
        set_json(
            self.storage.as_ref(),
            &version_metadata_key(staged.name())?,
            &committed,
        )?;
        Ok(())
    }
}
