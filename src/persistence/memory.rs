//! In-memory store for native runs and tests

use std::collections::HashMap;

use super::{KeyValueStore, StorageError};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub(crate) entries: HashMap<String, String>,
    /// Reject every write (simulates a full or disabled storage)
    pub read_only: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.read_only {
            return Err(StorageError::WriteRejected {
                key: key.to_string(),
                reason: "store is read-only".to_string(),
            });
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut store = MemoryStore::new();
        assert!(store.is_empty());
        store.set_item("a", "1").unwrap();
        assert_eq!(store.get_item("a").unwrap().as_deref(), Some("1"));
        store.set_item("a", "2").unwrap();
        assert_eq!(store.get_item("a").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get_item("b").unwrap(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_read_only_rejects() {
        let mut store = MemoryStore {
            read_only: true,
            ..Default::default()
        };
        assert!(store.set_item("a", "1").is_err());
        assert_eq!(store.len(), 0);
    }
}
