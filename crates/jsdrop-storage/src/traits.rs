//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use jsdrop_core::{StorageKey, StoredObject};
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Object already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// All storage backends (S3, local filesystem) must implement this trait, so the
/// upload pipeline works with any backend without coupling to its details.
///
/// Writes are create-only. `put` on a key that already holds an object fails
/// with [`StorageError::AlreadyExists`] and leaves the existing object intact.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist `data` under `key` and return the key with its public location.
    async fn put(
        &self,
        key: &StorageKey,
        content_type: &str,
        data: Bytes,
    ) -> StorageResult<StoredObject>;

    /// Download a file by its storage key
    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
