//! Best-effort key-value persistence
//!
//! Features:
//! - `KeyValueStore` abstraction (LocalStorage on web, in-memory natively)
//! - Per-key decoding of progress, so one corrupt entry never resets the rest
//! - Writes that never surface failures to the player

pub mod memory;
pub mod progress;

pub use memory::MemoryStore;
pub use progress::{ACHIEVEMENTS_KEY, EXPERIENCE_KEY, ProgressStore, SCORE_KEY};

use thiserror::Error;

/// Storage failures (logged, never fatal)
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("storage is not available")]
    Unavailable,
    #[error("write to `{key}` rejected: {reason}")]
    WriteRejected { key: String, reason: String },
}

/// String key-value store with LocalStorage semantics
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Read a key, treating errors as absence
pub fn read_key(store: &impl KeyValueStore, key: &str) -> Option<String> {
    match store.get_item(key) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Could not read `{}`: {}", key, e);
            None
        }
    }
}

/// Write a key, logging and swallowing failures
pub fn write_key(store: &mut impl KeyValueStore, key: &str, value: &str) -> bool {
    match store.set_item(key, value) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Could not write `{}`: {}", key, e);
            false
        }
    }
}
