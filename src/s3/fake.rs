use crate::s3::error::StorageError;
use crate::s3::storage::Storage;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub const FAKE_BUCKET: &str = "test-bucket";

/// `FakeStorage` is an in-memory implementation of the `Storage` trait for testing purposes.
/// It allows simulating missing configuration, missing credentials and per-object failures.
#[derive(Clone)]
pub struct FakeStorage {
    bucket: Option<String>,
    data: Arc<Mutex<HashMap<String, Bytes>>>,
    fail_objects: Arc<Mutex<HashSet<String>>>,
    has_credentials: Arc<AtomicBool>,
    #[cfg_attr(not(test), allow(dead_code))]
    buckets: Arc<Mutex<HashSet<String>>>,
}

#[allow(dead_code)]
impl FakeStorage {
    /// Create a new empty FakeStorage bound to `test-bucket`
    pub fn new() -> Self {
        Self::with_bucket(Some(FAKE_BUCKET))
    }

    /// Create a FakeStorage with no bucket configured
    pub fn without_bucket() -> Self {
        Self::with_bucket(None)
    }

    fn with_bucket(bucket: Option<&str>) -> Self {
        let buckets = bucket.iter().map(|b| b.to_string()).collect();
        FakeStorage {
            bucket: bucket.map(str::to_string),
            data: Arc::new(Mutex::new(HashMap::new())),
            fail_objects: Arc::new(Mutex::new(HashSet::new())),
            has_credentials: Arc::new(AtomicBool::new(true)),
            buckets: Arc::new(Mutex::new(buckets)),
        }
    }

    /// Simulate a failure for a specific object
    /// After calling this, reads and writes of this key return errors
    pub async fn fake_fail_object(&self, key: &str) {
        let mut fail_objects = self.fail_objects.lock().await;
        fail_objects.insert(key.to_string());
    }

    /// Drop the configured credentials, as if none were found in the environment
    pub fn fake_clear_credentials(&self) {
        self.has_credentials.store(false, Ordering::SeqCst);
    }

    /// Number of stored objects
    pub async fn fake_object_count(&self) -> usize {
        self.data.lock().await.len()
    }

    async fn is_failing(&self, key: &str) -> bool {
        self.fail_objects.lock().await.contains(key)
    }
}

#[async_trait]
impl Storage for FakeStorage {
    fn bucket(&self) -> Result<&str, StorageError> {
        self.bucket
            .as_deref()
            .ok_or(StorageError::BucketNotConfigured)
    }

    async fn put_object(&self, key: &str, data: Bytes) -> Result<(), StorageError> {
        self.bucket()?;

        if self.is_failing(key).await {
            return Err(StorageError::WriteError(
                key.to_string(),
                "Simulated failure".to_string(),
            ));
        }

        let mut storage_data = self.data.lock().await;
        storage_data.insert(key.to_string(), data);
        Ok(())
    }

    async fn presigned_get_url(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let bucket = self.bucket()?;

        if !self.has_credentials.load(Ordering::SeqCst) {
            return Err(StorageError::MissingCredentials);
        }

        Ok(format!(
            "https://{}.s3.amazonaws.com/{}?X-Amz-Algorithm=AWS4-HMAC-SHA256&X-Amz-Expires={}&X-Amz-Signature=fake",
            bucket,
            key,
            expires_in.as_secs()
        ))
    }

    #[cfg(test)]
    async fn get_object(&self, key: &str) -> Result<Bytes, StorageError> {
        if self.is_failing(key).await {
            return Err(StorageError::ObjectNotFound(key.to_string()));
        }

        let data = self.data.lock().await;
        match data.get(key) {
            Some(bytes) => Ok(bytes.clone()),
            None => Err(StorageError::ObjectNotFound(key.to_string())),
        }
    }

    #[cfg(test)]
    async fn remove_object(&self, key: &str) -> Result<(), StorageError> {
        let mut storage_data = self.data.lock().await;
        if storage_data.remove(key).is_some() {
            Ok(())
        } else {
            Err(StorageError::ObjectNotFound(key.to_string()))
        }
    }

    #[cfg(test)]
    async fn has_bucket(&self, bucket: &str) -> Result<bool, StorageError> {
        let buckets = self.buckets.lock().await;
        Ok(buckets.contains(bucket))
    }

    #[cfg(test)]
    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        let mut buckets = self.buckets.lock().await;
        buckets.insert(bucket.to_string());
        Ok(())
    }
}

impl Default for FakeStorage {
    fn default() -> Self {
        Self::new()
    }
}
