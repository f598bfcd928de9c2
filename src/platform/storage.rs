//! LocalStorage-backed store

use crate::persistence::{KeyValueStore, StorageError};

/// Window LocalStorage; every call fails with `Unavailable` if storage is
/// disabled (private mode, sandboxed iframe)
#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable; progress will not be kept");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, StorageError> {
        self.storage.as_ref().ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(key)
            .map_err(|_| StorageError::Unavailable)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::WriteRejected {
                key: key.to_string(),
                reason: format!("{:?}", e),
            })
    }
}
