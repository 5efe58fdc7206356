//! Version graph storage.
//!
//! A version graph persists everything it knows (version documents, entry trees, raw
//! chunk bytes) through a small set of primitive key/value operations on a store.
//! This module defines the abstract store interface and an in-memory store.
//!
//! The core has no native transaction support on top of these primitives; the
//! [`graph`](crate::graph) and [`commit`](crate::commit) modules order their writes so
//! that a failed operation never leaves a committed-looking version behind.

mod memory_store;
mod store_key;
mod store_prefix;

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

pub use self::{
    memory_store::MemoryStore,
    store_key::{StoreKey, StoreKeyError, StoreKeys},
    store_prefix::{StorePrefix, StorePrefixError},
};

/// Bytes retrieved from a store, or [`None`] if the key is absent.
pub type MaybeBytes = Option<Vec<u8>>;

/// A storage error.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An invalid store key.
    #[error(transparent)]
    InvalidStoreKey(#[from] StoreKeyError),
    /// An invalid store prefix.
    #[error(transparent)]
    InvalidStorePrefix(#[from] StorePrefixError),
    /// An error serializing or deserializing a metadata document.
    #[error(transparent)]
    InvalidMetadata(#[from] serde_json::Error),
    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Readable store operations.
pub trait ReadableStorageTraits: Send + Sync {
    /// Retrieve the value at `key`, or [`None`] if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the underlying store fails.
    fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError>;
}

/// Writable store operations.
pub trait WritableStorageTraits: Send + Sync {
    /// Store `value` at `key`, replacing any existing value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the underlying store fails.
    fn set(&self, key: &StoreKey, value: &[u8]) -> Result<(), StorageError>;

    /// Erase the value at `key`. Returns `true` if a value existed.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the underlying store fails.
    fn erase(&self, key: &StoreKey) -> Result<bool, StorageError>;

    /// Erase all values with keys under `prefix`. Returns `true` if any value existed.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the underlying store fails.
    fn erase_prefix(&self, prefix: &StorePrefix) -> Result<bool, StorageError>;
}

/// Listable store operations.
pub trait ListableStorageTraits: Send + Sync {
    /// List all keys under `prefix`, in lexicographical order.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the underlying store fails.
    fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError>;
}

/// A store supporting reads and writes.
pub trait ReadableWritableStorageTraits: ReadableStorageTraits + WritableStorageTraits {}

impl<T: ?Sized + ReadableStorageTraits + WritableStorageTraits> ReadableWritableStorageTraits
    for T
{
}

/// A store supporting reads and listing.
pub trait ReadableListableStorageTraits: ReadableStorageTraits + ListableStorageTraits {}

impl<T: ?Sized + ReadableStorageTraits + ListableStorageTraits> ReadableListableStorageTraits
    for T
{
}

/// A store supporting reads, writes, and listing.
pub trait ReadableWritableListableStorageTraits:
    ReadableWritableStorageTraits + ListableStorageTraits
{
}

impl<T: ?Sized + ReadableWritableStorageTraits + ListableStorageTraits>
    ReadableWritableListableStorageTraits for T
{
}

/// Retrieve and deserialize the JSON document at `key`, or [`None`] if absent.
pub(crate) fn get_json<T: DeserializeOwned>(
    storage: &(impl ReadableStorageTraits + ?Sized),
    key: &StoreKey,
) -> Result<Option<T>, StorageError> {
    match storage.get(key)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

/// Serialize `document` as JSON and store it at `key`.
pub(crate) fn set_json<T: Serialize>(
    storage: &(impl WritableStorageTraits + ?Sized),
    key: &StoreKey,
    document: &T,
) -> Result<(), StorageError> {
    storage.set(key, &serde_json::to_vec(document)?)
}
