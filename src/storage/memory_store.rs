//! An in-memory store.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::{
    ListableStorageTraits, MaybeBytes, ReadableStorageTraits, StorageError, StoreKey, StoreKeys,
    StorePrefix, WritableStorageTraits,
};

/// An in-memory store.
///
/// Suitable for testing and for version graphs that do not outlive the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data_map: RwLock<BTreeMap<StoreKey, Vec<u8>>>,
}

impl MemoryStore {
    /// Create a new, empty memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReadableStorageTraits for MemoryStore {
    fn get(&self, key: &StoreKey) -> Result<MaybeBytes, StorageError> {
        let data_map = self.data_map.read();
        Ok(data_map.get(key).cloned())
    }
}

impl WritableStorageTraits for MemoryStore {
    fn set(&self, key: &StoreKey, value: &[u8]) -> Result<(), StorageError> {
        let mut data_map = self.data_map.write();
        data_map.insert(key.clone(), value.to_vec());
        Ok(())
    }

    fn erase(&self, key: &StoreKey) -> Result<bool, StorageError> {
        let mut data_map = self.data_map.write();
        Ok(data_map.remove(key).is_some())
    }

    fn erase_prefix(&self, prefix: &StorePrefix) -> Result<bool, StorageError> {
        let mut data_map = self.data_map.write();
        let len = data_map.len();
        data_map.retain(|key, _| !key.has_prefix(prefix));
        Ok(data_map.len() != len)
    }
}

impl ListableStorageTraits for MemoryStore {
    fn list_prefix(&self, prefix: &StorePrefix) -> Result<StoreKeys, StorageError> {
        let data_map = self.data_map.read();
        Ok(data_map
            .keys()
            .filter(|key| key.has_prefix(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn memory_set_get_erase() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        let key = "a/b".try_into()?;
        assert!(store.get(&key)?.is_none());
        store.set(&key, &[0, 1, 2])?;
        assert_eq!(store.get(&key)?.unwrap(), &[0, 1, 2]);
        store.set(&key, &[3])?;
        assert_eq!(store.get(&key)?.unwrap(), &[3]);
        assert!(store.erase(&key)?);
        assert!(!store.erase(&key)?);
        assert!(store.get(&key)?.is_none());
        Ok(())
    }

    #[test]
    fn memory_list_prefix() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        store.set(&"a/b".try_into()?, &[0])?;
        store.set(&"a/c".try_into()?, &[0])?;
        store.set(&"a/d/e".try_into()?, &[0])?;
        store.set(&"b/f".try_into()?, &[0])?;
        assert_eq!(
            store.list_prefix(&"a/".try_into()?)?,
            vec![
                StoreKey::new("a/b")?,
                StoreKey::new("a/c")?,
                StoreKey::new("a/d/e")?
            ]
        );
        assert_eq!(
            store.list_prefix(&"a/d/".try_into()?)?,
            vec![StoreKey::new("a/d/e")?]
        );
        assert_eq!(store.list_prefix(&StorePrefix::root())?.len(), 4);
        assert!(store.list_prefix(&"c/".try_into()?)?.is_empty());
        Ok(())
    }

    #[test]
    fn memory_erase_prefix() -> Result<(), Box<dyn Error>> {
        let store = MemoryStore::new();
        store.set(&"a/b".try_into()?, &[0])?;
        store.set(&"a/c/d".try_into()?, &[0])?;
        store.set(&"b/e".try_into()?, &[0])?;
        assert!(store.erase_prefix(&"a/".try_into()?)?);
        assert!(!store.erase_prefix(&"a/".try_into()?)?);
        assert_eq!(
            store.list_prefix(&StorePrefix::root())?,
            vec![StoreKey::new("b/e")?]
        );
        Ok(())
    }
}
