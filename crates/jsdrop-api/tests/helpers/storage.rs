use async_trait::async_trait;
use bytes::Bytes;
use jsdrop_core::{StorageBackend, StorageKey, StoredObject};
use jsdrop_storage::{LocalStorage, Storage, StorageError, StorageResult};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Local storage that counts how many writes reached it.
pub struct RecordingStorage {
    inner: LocalStorage,
    puts: AtomicUsize,
}

impl RecordingStorage {
    pub fn new(inner: LocalStorage) -> Self {
        Self {
            inner,
            puts: AtomicUsize::new(0),
        }
    }

    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Storage for RecordingStorage {
    async fn put(
        &self,
        key: &StorageKey,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<StoredObject> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, content_type, data).await
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        self.inner.download(storage_key).await
    }

    fn backend_type(&self) -> StorageBackend {
        self.inner.backend_type()
    }
}

/// Backend that is always down.
pub struct UnavailableStorage;

#[async_trait]
impl Storage for UnavailableStorage {
    async fn put(
        &self,
        _key: &StorageKey,
        _content_type: &str,
        _data: Bytes,
    ) -> StorageResult<StoredObject> {
        Err(StorageError::UploadFailed("connection refused".to_string()))
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        Err(StorageError::NotFound(storage_key.to_string()))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}
