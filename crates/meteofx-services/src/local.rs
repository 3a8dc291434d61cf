//! Local preference and history store.
//!
//! `LocalStore` wraps an optional [`KeyValueStore`] backend. Reads never fail:
//! a missing key reads as empty, and a blob that fails to parse is removed and
//! read as empty. Writes return a [`StorageResult`] and log failures.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::kv::{KeyValueStore, StorageError, StorageResult};
use crate::schema::SchemaRejection;

#[derive(Clone)]
pub struct LocalStore {
    backend: Option<Arc<Mutex<Box<dyn KeyValueStore>>>>,
}

impl std::fmt::Debug for LocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalStore")
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl LocalStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Some(Arc::new(Mutex::new(Box::new(backend)))),
        }
    }

    /// A store with no backend. Reads are empty and writes succeed without
    /// persisting anything.
    pub fn detached() -> Self {
        Self { backend: None }
    }

    pub fn is_attached(&self) -> bool {
        self.backend.is_some()
    }

    /// Run `f` with exclusive access to the backend.
    ///
    /// Returns `None` when detached.
    pub(crate) fn with_backend<R>(&self, f: impl FnOnce(&dyn KeyValueStore) -> R) -> Option<R> {
        let backend = self.backend.as_ref()?;
        let guard = backend.lock();
        Some(f(&**guard))
    }
}

/// Read and parse `key`, removing it if the stored value is rejected.
pub(crate) fn read_healing<T>(
    kv: &dyn KeyValueStore,
    key: &str,
    parse: impl FnOnce(&str) -> Result<T, SchemaRejection>,
) -> Option<T> {
    let raw = match kv.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            tracing::error!("Error reading {}: {}", key, e);
            return None;
        }
    };

    match parse(&raw) {
        Ok(value) => Some(value),
        Err(rejection) => {
            tracing::warn!("Discarding corrupted {}: {}", key, rejection);
            if let Err(e) = kv.remove(key) {
                tracing::error!("Error removing corrupted {}: {}", key, e);
            }
            None
        }
    }
}

pub(crate) fn write_json<T: Serialize + ?Sized>(
    kv: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> StorageResult<()> {
    let result = serde_json::to_string(value)
        .map_err(StorageError::from)
        .and_then(|raw| kv.set(key, &raw));
    if let Err(e) = &result {
        tracing::error!("Error saving {}: {}", key, e);
    }
    result
}

pub(crate) fn remove_key(kv: &dyn KeyValueStore, key: &str) -> StorageResult<()> {
    let result = kv.remove(key);
    if let Err(e) = &result {
        tracing::error!("Error clearing {}: {}", key, e);
    }
    result
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use crate::kv::MemoryStore;

    #[test]
    fn test_read_healing_removes_rejected_blob() {
        let kv = MemoryStore::new();
        kv.set("key", "garbage").unwrap();

        let parsed: Option<()> = read_healing(&kv, "key", |_| Err(SchemaRejection::Shape("x")));
        assert!(parsed.is_none());
        assert!(!kv.contains_key("key"));
    }

    #[test]
    fn test_read_healing_keeps_valid_blob() {
        let kv = MemoryStore::new();
        kv.set("key", "42").unwrap();

        let parsed = read_healing(&kv, "key", |raw| {
            raw.parse::<i32>().map_err(|e| SchemaRejection::Malformed(e.to_string()))
        });
        assert_eq!(parsed, Some(42));
        assert!(kv.contains_key("key"));
    }

    #[test]
    fn test_detached_store() {
        let store = LocalStore::detached();
        assert!(!store.is_attached());
        assert!(store.with_backend(|_| ()).is_none());
        assert!(LocalStore::new(MemoryStore::new()).is_attached());
    }
}
