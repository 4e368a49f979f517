//! In-process store, used when no storage directory is configured.

use axum::body::Bytes;
use dashmap::DashMap;

use super::{BlobStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: DashMap<String, Bytes>,
}

impl MemoryStore {
    pub fn new() -> Self { Self { objects: DashMap::new() } }

    pub fn len(&self) -> usize { self.objects.len() }

    pub fn is_empty(&self) -> bool { self.objects.is_empty() }
}

impl BlobStore for MemoryStore {
    async fn put(&self, key: &str, body: Bytes) -> Result<(), StoreError> {
        self.objects.insert(key.to_string(), body);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        self.objects
            .get(key)
            .map(|b| b.value().clone())
            .ok_or_else(|| StoreError::NotFound(key.to_string()))
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        let mut keys: Vec<String> = self
            .objects
            .iter()
            .filter(|e| e.key().starts_with(prefix))
            .map(|e| e.key().clone())
            .collect();
        keys.sort();
        Ok(keys)
    }

    async fn copy(&self, from: &str, to: &str) -> Result<(), StoreError> {
        // clone out before inserting: holding a read guard while writing the same shard deadlocks
        let body = self.get(from).await?;
        self.objects.insert(to.to_string(), body);
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.objects.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::move_object;

    #[tokio::test]
    async fn put_get_list_delete() {
        let store = MemoryStore::new();
        store.put("a/2.jpg", Bytes::from_static(b"two")).await.unwrap();
        store.put("a/1.jpg", Bytes::from_static(b"one")).await.unwrap();
        store.put("b/1.jpg", Bytes::from_static(b"other")).await.unwrap();

        assert_eq!(store.list("a/").await.unwrap(), vec!["a/1.jpg", "a/2.jpg"]);
        assert_eq!(store.get("a/2.jpg").await.unwrap(), Bytes::from_static(b"two"));

        store.delete("a/2.jpg").await.unwrap();
        store.delete("a/2.jpg").await.unwrap();
        assert!(matches!(store.get("a/2.jpg").await, Err(StoreError::NotFound(_))));
        assert_eq!(store.len(), 2);
    }

    #[tokio::test]
    async fn move_copies_then_removes_source() {
        let store = MemoryStore::new();
        store.put("in/x.jpg", Bytes::from_static(b"x")).await.unwrap();
        move_object(&store, "in/x.jpg", "done/x.jpg").await.unwrap();
        assert!(store.list("in/").await.unwrap().is_empty());
        assert_eq!(store.get("done/x.jpg").await.unwrap(), Bytes::from_static(b"x"));

        let missing = move_object(&store, "in/x.jpg", "done/y.jpg").await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }
}
