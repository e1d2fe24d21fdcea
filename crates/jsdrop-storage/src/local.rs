use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use jsdrop_core::{StorageKey, StoredObject};
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    base_url: String,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `base_path` - Root directory for file storage (e.g., "/var/lib/jsdrop/bundles")
    /// * `base_url` - Base URL for serving files (e.g., "http://localhost:5000/bundles")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            base_url,
        })
    }

    /// Convert storage key to filesystem path with security validation
    ///
    /// Keys are flat, so anything that could name another directory is refused.
    fn key_to_path(&self, storage_key: &str) -> StorageResult<PathBuf> {
        if storage_key.is_empty()
            || storage_key == "."
            || storage_key == ".."
            || storage_key.contains('/')
            || storage_key.contains('\\')
        {
            return Err(StorageError::InvalidKey(
                "Storage key contains invalid characters".to_string(),
            ));
        }

        Ok(self.base_path.join(storage_key))
    }

    /// Generate public URL for file
    fn generate_url(&self, key: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(key)
        )
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn put(
        &self,
        key: &StorageKey,
        _content_type: &str,
        data: Bytes,
    ) -> StorageResult<StoredObject> {
        let path = self.key_to_path(key.as_str())?;
        let size = data.len();
        let start = std::time::Instant::now();

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => StorageError::AlreadyExists(key.to_string()),
                _ => StorageError::UploadFailed(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                )),
            })?;

        file.write_all(&data).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to write file {}: {}", path.display(), e))
        })?;

        file.sync_all().await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to sync file {}: {}", path.display(), e))
        })?;

        tracing::info!(
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local upload successful"
        );

        Ok(StoredObject {
            key: key.clone(),
            location: self.generate_url(key.as_str()),
        })
    }

    async fn download(&self, storage_key: &str) -> StorageResult<Vec<u8>> {
        let path = self.key_to_path(storage_key)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_key.to_string()))
            }
            Err(e) => Err(StorageError::DownloadFailed(format!(
                "Failed to read file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Local
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_local_storage_put_download() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:5000/bundles/".to_string())
            .await
            .unwrap();

        let key = StorageKey::new("bundle-1700000000000.js");
        let data = Bytes::from_static(b"console.log('hi');");

        let stored = storage
            .put(&key, "text/javascript", data.clone())
            .await
            .unwrap();

        assert_eq!(stored.key, key);
        assert_eq!(
            stored.location,
            "http://localhost:5000/bundles/bundle-1700000000000.js"
        );

        let downloaded = storage.download(key.as_str()).await.unwrap();
        assert_eq!(downloaded, data.to_vec());
    }

    #[tokio::test]
    async fn test_put_never_overwrites() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:5000/bundles".to_string())
            .await
            .unwrap();

        let key = StorageKey::new("bundle-1.js");
        storage
            .put(&key, "text/javascript", Bytes::from_static(b"first"))
            .await
            .unwrap();

        let second = storage
            .put(&key, "text/javascript", Bytes::from_static(b"second"))
            .await;
        assert!(matches!(second, Err(StorageError::AlreadyExists(_))));

        assert_eq!(storage.download("bundle-1.js").await.unwrap(), b"first");
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:5000/bundles".to_string())
            .await
            .unwrap();

        let result = storage.download("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage
            .put(
                &StorageKey::new("/etc/passwd"),
                "text/plain",
                Bytes::from_static(b"x"),
            )
            .await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_download_missing() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:5000/bundles".to_string())
            .await
            .unwrap();

        let result = storage.download("nothing-1.js").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_location_is_url_encoded() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:5000/bundles".to_string())
            .await
            .unwrap();

        let stored = storage
            .put(
                &StorageKey::new("my bundle-3.js"),
                "text/javascript",
                Bytes::from_static(b"1"),
            )
            .await
            .unwrap();
        assert_eq!(
            stored.location,
            "http://localhost:5000/bundles/my%20bundle-3.js"
        );
    }
}
