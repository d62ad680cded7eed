//! Key-value persistence for accounts, match records and counters.
//!
//! The game core never sees this module. Everything is stored as JSON text
//! under a string key, the same shape a browser's local storage would hold.

mod error;
mod memory;
mod models;
mod schema; // Diesel generated schema - internal use only
mod sqlite;

pub use error::{StoreError, StoreErrorKind};
pub use memory::MemoryStore;
pub use models::{KvEntry, NewKvEntry};
pub use sqlite::SqliteStore;

use serde::{Serialize, de::DeserializeOwned};

/// A string-keyed blob store.
///
/// Implementations are cheap handles: clones talk to the same storage.
pub trait KeyValueStore {
    /// Reads the blob under `key`.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Writes `value` under `key`, replacing any previous blob.
    fn put(&self, key: &str, value: String) -> Result<(), StoreError>;

    /// Deletes the blob under `key`. Returns whether something was removed.
    fn remove(&self, key: &str) -> Result<bool, StoreError>;

    /// Reads and decodes a JSON blob.
    fn get_json<T>(&self, key: &str) -> Result<Option<T>, StoreError>
    where
        Self: Sized,
        T: DeserializeOwned,
    {
        self.get(key)?
            .map(|blob| serde_json::from_str(&blob).map_err(StoreError::from))
            .transpose()
    }

    /// Encodes and writes a JSON blob.
    fn put_json<T>(&self, key: &str, value: &T) -> Result<(), StoreError>
    where
        Self: Sized,
        T: Serialize + ?Sized,
    {
        self.put(key, serde_json::to_string(value)?)
    }
}
