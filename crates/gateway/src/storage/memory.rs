//! In-process [`ObjectStore`] used by tests.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use bytes::Bytes;

use super::{ObjectStore, StorageError};

#[derive(Clone, Debug, Default)]
pub struct MemoryObjectStore {
    objects: Arc<Mutex<HashMap<String, Bytes>>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite an object directly, bypassing `put`. Used to simulate
    /// corruption at rest.
    pub fn insert_raw(&self, key: &str, body: impl Into<Bytes>) {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_owned(), body.into());
    }

    pub fn raw(&self, key: &str) -> Option<Bytes> {
        self.objects.lock().unwrap().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn put(&self, key: &str, body: Bytes) -> Result<(), StorageError> {
        self.insert_raw(key, body);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, StorageError> {
        self.raw(key).ok_or_else(|| StorageError::NotFound {
            key: key.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn put_then_get() {
        let store = MemoryObjectStore::new();
        store.put("a.enc", Bytes::from_static(b"xyz")).await.unwrap();
        assert_eq!(store.get("a.enc").await.unwrap(), Bytes::from_static(b"xyz"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let store = MemoryObjectStore::new();
        let err = store.get("missing.enc").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { ref key } if key == "missing.enc"));
    }
}
