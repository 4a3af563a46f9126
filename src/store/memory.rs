//! In-memory object store for tests and development
//!
//! Not suitable for production — contents are lost on restart.

// expect on lock acquisition: poisoning only follows a panicking writer
#![allow(clippy::expect_used)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::StoreError;
use crate::store::ObjectStore;

/// Object store holding everything in process memory
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryObjectStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate an object, as if a previous run had stored it
    pub fn insert(&self, key: impl Into<String>, body: Vec<u8>) {
        self.objects.write().expect("store lock").insert(key.into(), body);
    }

    /// Fetch a stored object's bytes
    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().expect("store lock").get(key).cloned()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.read().expect("store lock").len()
    }

    /// Whether the store holds no objects
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn head(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.objects.read().expect("store lock").contains_key(key))
    }

    async fn put(
        &self,
        key: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StoreError> {
        self.objects
            .write()
            .expect("store lock")
            .insert(key.to_string(), body);
        Ok(())
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn head_and_put_round_trip() {
        let store = MemoryObjectStore::new();
        assert!(!store.head("a.ndjson").await.unwrap());

        store
            .put("a.ndjson", b"line\n".to_vec(), "application/x-ndjson")
            .await
            .unwrap();

        assert!(store.head("a.ndjson").await.unwrap());
        assert_eq!(store.object("a.ndjson").unwrap(), b"line\n");
    }

    #[tokio::test]
    async fn put_overwrites_previous_content() {
        let store = MemoryObjectStore::new();
        store.put("k", b"old".to_vec(), "text/plain").await.unwrap();
        store.put("k", b"new".to_vec(), "text/plain").await.unwrap();

        assert_eq!(store.object("k").unwrap(), b"new");
        assert_eq!(store.len(), 1);
    }
}
