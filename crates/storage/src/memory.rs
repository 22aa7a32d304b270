use std::{cell::RefCell, collections::BTreeMap};

use crate::{KeyValueStore, StoreError};

/// An in-memory key-value store.
///
/// If a quota is set, writes that would make the total size of all keys and values exceed it
/// are rejected with `StoreError::QuotaExceeded`.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RefCell<BTreeMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_quota(quota: usize) -> Self {
        Self {
            items: RefCell::default(),
            quota: Some(quota),
        }
    }

    /// Total size of all keys and values in bytes.
    #[must_use]
    pub fn used_bytes(&self) -> usize {
        self.items
            .borrow()
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        if let Some(quota) = self.quota {
            let replaced = self
                .items
                .borrow()
                .get(key)
                .map_or(0, |previous| key.len() + previous.len());
            if self.used_bytes() - replaced + key.len() + value.len() > quota {
                return Err(StoreError::QuotaExceeded);
            }
        }

        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_get_set_remove() {
        let store = MemoryStore::new();

        assert_eq!(store.get_item("a"), Ok(None));
        store.set_item("a", "1").unwrap();
        assert_eq!(store.get_item("a"), Ok(Some("1".to_string())));
        store.set_item("a", "2").unwrap();
        assert_eq!(store.get_item("a"), Ok(Some("2".to_string())));
        store.remove_item("a").unwrap();
        assert_eq!(store.get_item("a"), Ok(None));
        store.remove_item("a").unwrap();
    }

    #[test]
    fn test_quota() {
        let store = MemoryStore::with_quota(10);

        store.set_item("key", "1234567").unwrap();
        assert_eq!(store.used_bytes(), 10);
        assert_eq!(store.set_item("k", "v"), Err(StoreError::QuotaExceeded));
        assert_eq!(store.set_item("key", "12345678"), Err(StoreError::QuotaExceeded));
        assert_eq!(store.get_item("key"), Ok(Some("1234567".to_string())));
        store.set_item("key", "123").unwrap();
        store.set_item("k", "v").unwrap();
        assert_eq!(store.used_bytes(), 8);
    }
}
