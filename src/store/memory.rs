//! In-process store.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

use crate::store::{KeyValueStore, StoreError, StoreErrorKind};

/// Store backed by a shared map. Contents vanish with the last handle.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::new(StoreErrorKind::Poisoned, "memory store"))
    }
}

impl KeyValueStore for MemoryStore {
    #[instrument(skip(self))]
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self.entries()?.get(key).cloned();
        debug!(found = value.is_some(), "Read blob");
        Ok(value)
    }

    #[instrument(skip(self, value), fields(len = value.len()))]
    fn put(&self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries()?.insert(key.to_string(), value);
        debug!("Wrote blob");
        Ok(())
    }

    #[instrument(skip(self))]
    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries()?.remove(key).is_some())
    }
}
