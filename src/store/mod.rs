//! Blob storage for participant photos.

use std::future::Future;

use axum::body::Bytes;

pub mod fs;
pub mod memory;
pub mod partition;

pub use fs::FsStore;
pub use memory::MemoryStore;
pub use partition::Partitions;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("object not found: {0}")]
    NotFound(String),
    #[error("invalid key: {0}")]
    InvalidKey(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Minimal object-store surface: flat string keys, list by prefix.
pub trait BlobStore: Send + Sync {
    fn put(&self, key: &str, body: Bytes) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn get(&self, key: &str) -> impl Future<Output = Result<Bytes, StoreError>> + Send;

    /// Keys under `prefix`, sorted.
    fn list(&self, prefix: &str) -> impl Future<Output = Result<Vec<String>, StoreError>> + Send;

    fn copy(&self, from: &str, to: &str) -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Deleting a missing key succeeds.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), StoreError>> + Send;
}

/// Backend chosen at startup.
#[derive(Debug)]
pub enum Store {
    Memory(MemoryStore),
    Fs(FsStore),
}

impl BlobStore for Store {
    async fn put(&self, key: &str, body: Bytes) -> Result<(), StoreError> {
        match self {
            Store::Memory(s) => s.put(key, body).await,
            Store::Fs(s) => s.put(key, body).await,
        }
    }

    async fn get(&self, key: &str) -> Result<Bytes, StoreError> {
        match self {
            Store::Memory(s) => s.get(key).await,
            Store::Fs(s) => s.get(key).await,
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError> {
        match self {
            Store::Memory(s) => s.list(prefix).await,
            Store::Fs(s) => s.list(prefix).await,
        }
    }

    async fn copy(&self, from: &str, to: &str) -> Result<(), StoreError> {
        match self {
            Store::Memory(s) => s.copy(from, to).await,
            Store::Fs(s) => s.copy(from, to).await,
        }
    }

    async fn delete(&self, key: &str) -> Result<(), StoreError> {
        match self {
            Store::Memory(s) => s.delete(key).await,
            Store::Fs(s) => s.delete(key).await,
        }
    }
}

/// Copy then delete; object stores have no rename.
pub async fn move_object<S: BlobStore>(store: &S, from: &str, to: &str) -> Result<(), StoreError> {
    store.copy(from, to).await?;
    store.delete(from).await
}
