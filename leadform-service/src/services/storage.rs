//! File storage for uploaded context documents.

use async_trait::async_trait;
use service_core::error::AppError;
use std::path::{Path, PathBuf};

/// Storage backend for raw document bytes.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn upload(&self, key: &str, data: Vec<u8>) -> Result<(), AppError>;
    async fn download(&self, key: &str) -> Result<Vec<u8>, AppError>;
    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

/// Local-filesystem storage rooted at a configured directory.
pub struct LocalStorage {
    root: PathBuf,
}

impl LocalStorage {
    pub async fn new(root: &str) -> Result<Self, AppError> {
        tokio::fs::create_dir_all(root).await.map_err(|e| {
            tracing::error!("Failed to create storage directory {}: {}", root, e);
            AppError::from(e)
        })?;
        Ok(Self {
            root: PathBuf::from(root),
        })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, AppError> {
        // Keys are server-generated uuids; reject anything that could
        // escape the storage root.
        let candidate = Path::new(key);
        if candidate.is_absolute()
            || candidate
                .components()
                .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "Invalid storage key: {}",
                key
            )));
        }
        Ok(self.root.join(candidate))
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn upload(&self, key: &str, data: Vec<u8>) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        tokio::fs::write(&path, data).await.map_err(|e| {
            tracing::error!("Failed to write {}: {}", path.display(), e);
            AppError::from(e)
        })
    }

    async fn download(&self, key: &str) -> Result<Vec<u8>, AppError> {
        let path = self.path_for(key)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    AppError::NotFound(anyhow::anyhow!("Stored file not found: {}", key))
                }
                _ => AppError::from(e),
            })
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            // Already gone is fine; deletion is idempotent.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::from(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_traversal_keys() {
        let storage = LocalStorage::new("./target/test-storage").await.unwrap();
        assert!(storage.download("../secrets").await.is_err());
        assert!(storage.download("/etc/passwd").await.is_err());
    }

    #[tokio::test]
    async fn round_trips_and_deletes() {
        let storage = LocalStorage::new("./target/test-storage").await.unwrap();
        storage
            .upload("test-key.txt", b"hello".to_vec())
            .await
            .unwrap();
        assert_eq!(storage.download("test-key.txt").await.unwrap(), b"hello");
        storage.delete("test-key.txt").await.unwrap();
        assert!(storage.download("test-key.txt").await.is_err());
        // Deleting again is a no-op.
        storage.delete("test-key.txt").await.unwrap();
    }
}
