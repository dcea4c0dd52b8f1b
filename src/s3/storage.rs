use crate::s3::error::StorageError;
use async_trait::async_trait;
use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Storage trait defining the interface for the bucket holding candidate images
#[async_trait]
pub trait Storage: Send + Sync + 'static {
    /// Name of the bucket every operation is scoped to
    fn bucket(&self) -> Result<&str, StorageError>;

    /// Write an object, replacing whatever is stored under `key`
    ///
    /// * `key` - The object key to write
    /// * `data` - The object body
    async fn put_object(&self, key: &str, data: Bytes) -> Result<(), StorageError>;

    /// Upload the contents of a local file under `key`
    async fn upload_file(&self, key: &str, path: &Path) -> Result<(), StorageError> {
        debug!("Reading {} for upload to {}", path.display(), key);
        let data = tokio::fs::read(path).await?;
        self.put_object(key, Bytes::from(data)).await
    }

    /// Generate a time-limited, read-only URL for `key`
    ///
    /// The object is not required to exist.
    async fn presigned_get_url(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError>;

    /// Logical `s3://bucket/key` locator for an object
    fn object_reference(&self, key: &str) -> Result<String, StorageError> {
        Ok(format!("s3://{}/{}", self.bucket()?, key))
    }

    /// Get an object by its key (test-only)
    #[cfg(test)]
    async fn get_object(&self, key: &str) -> Result<Bytes, StorageError>;

    /// Remove an object from storage (test-only)
    #[cfg(test)]
    async fn remove_object(&self, key: &str) -> Result<(), StorageError>;

    /// Check if a bucket exists (test-only)
    #[cfg(test)]
    async fn has_bucket(&self, bucket: &str) -> Result<bool, StorageError>;

    /// Create a bucket (test-only)
    #[cfg(test)]
    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError>;
}

/// Implementation of Storage trait for Arc<T> where T implements Storage
///
/// This allows sharing storage instances across threads and components efficiently.
#[async_trait]
impl<T: Storage + ?Sized> Storage for Arc<T> {
    fn bucket(&self) -> Result<&str, StorageError> {
        (**self).bucket()
    }

    async fn put_object(&self, key: &str, data: Bytes) -> Result<(), StorageError> {
        (**self).put_object(key, data).await
    }

    async fn upload_file(&self, key: &str, path: &Path) -> Result<(), StorageError> {
        (**self).upload_file(key, path).await
    }

    async fn presigned_get_url(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        (**self).presigned_get_url(key, expires_in).await
    }

    fn object_reference(&self, key: &str) -> Result<String, StorageError> {
        (**self).object_reference(key)
    }

    #[cfg(test)]
    async fn get_object(&self, key: &str) -> Result<Bytes, StorageError> {
        (**self).get_object(key).await
    }

    #[cfg(test)]
    async fn remove_object(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_object(key).await
    }

    #[cfg(test)]
    async fn has_bucket(&self, bucket: &str) -> Result<bool, StorageError> {
        (**self).has_bucket(bucket).await
    }

    #[cfg(test)]
    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        (**self).create_bucket(bucket).await
    }
}
