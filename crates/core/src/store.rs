use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{callbacks::SecureStoreBackend, error::StoreError};

/// Secure key-value storage as the adapters expose it to the runtime.
///
/// Keys are unique; `set` on an existing key overwrites, `remove` of an
/// absent key succeeds, and a missing key reads as `Ok(None)`. Every
/// implementation serializes access to its backing store, so a `get` issued
/// after a `set` for the same key observes the written value.
pub trait SecureStore: Send + Sync {
    /// Gets the value for the given key, or None if not found.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Sets the value for the given key.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes the entry for the given key.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Returns every entry currently stored.
    fn get_all(&self) -> Result<HashMap<String, String>, StoreError>;
}

/// Non-durable store backing the mock adapter. Contents live for the
/// process only; browser builds get a fresh store per page load.
#[derive(Default, Debug)]
pub struct MemoryStore(Mutex<HashMap<String, String>>);

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SecureStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.0.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.0.lock().unwrap().insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.0.lock().unwrap().remove(key);
        Ok(())
    }

    fn get_all(&self) -> Result<HashMap<String, String>, StoreError> {
        Ok(self.0.lock().unwrap().clone())
    }
}

/// Adapts a host-implemented [SecureStoreBackend] to the [SecureStore]
/// seam. Pure forwarding; backend errors pass through untouched.
pub struct BridgedStore {
    backend: Arc<dyn SecureStoreBackend>,
}

impl BridgedStore {
    pub fn new(backend: Arc<dyn SecureStoreBackend>) -> Self {
        Self { backend }
    }
}

impl SecureStore for BridgedStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.backend.get(key.to_owned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.backend.set(key.to_owned(), value.to_owned())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(key.to_owned())
    }

    fn get_all(&self) -> Result<HashMap<String, String>, StoreError> {
        self.backend.get_all()
    }
}
