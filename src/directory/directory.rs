use crate::candidate::{Candidate, Mapping};
use crate::config::Config;
use crate::directory::error::DirectoryError;
use crate::dynamo::{DynamoTable, Table};
use crate::s3::{S3Storage, Storage, StorageError};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Lifetime of presigned image links unless the caller asks otherwise
pub const DEFAULT_PRESIGN_EXPIRY: Duration = Duration::from_secs(3600);

/// Confirmation returned after an image upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUpload {
    pub message: String,
    /// Logical `s3://bucket/key` locator, not a fetchable URL
    pub image_url: String,
}

/// Mediates every read and write of candidate records and their images
pub struct CandidateDirectory<T: Table, S: Storage> {
    table: Arc<T>,
    storage: Arc<S>,
}

impl<T: Table, S: Storage> Clone for CandidateDirectory<T, S> {
    fn clone(&self) -> Self {
        CandidateDirectory {
            table: self.table.clone(),
            storage: self.storage.clone(),
        }
    }
}

impl CandidateDirectory<DynamoTable, S3Storage> {
    /// Build a directory backed by DynamoDB and S3
    ///
    /// Fails before any client is created when no table name is configured.
    /// The bucket name is checked lazily by the operations that need it.
    pub fn from_config(config: &Config) -> Result<Self, DirectoryError> {
        let table_name = config
            .aws
            .dynamodb_table
            .as_deref()
            .ok_or_else(|| {
                DirectoryError::Configuration(
                    "AWS_DYNAMODB_TABLE environment variable not set".to_string(),
                )
            })?;

        let table = DynamoTable::new(&config.aws, table_name);
        let storage = S3Storage::new(&config.aws);

        Ok(Self::new(table, storage))
    }
}

impl<T: Table, S: Storage> CandidateDirectory<T, S> {
    pub fn new(table: T, storage: S) -> Self {
        CandidateDirectory {
            table: Arc::new(table),
            storage: Arc::new(storage),
        }
    }

    /// Object key of a candidate's image
    ///
    /// Upload, create and presign all go through this one function.
    pub fn image_key(uin: i64) -> String {
        format!("{}.jpg", uin)
    }

    /// Time-limited read URL for a candidate's image
    ///
    /// Returns `Ok(None)` when the store has no credentials to sign with.
    /// A missing bucket and every other failure are returned as errors.
    /// The image itself is not required to exist.
    pub async fn presigned_image_url(
        &self,
        uin: i64,
        expires_in: Duration,
    ) -> Result<Option<String>, DirectoryError> {
        let key = Self::image_key(uin);

        match self.storage.presigned_get_url(&key, expires_in).await {
            Ok(url) => Ok(Some(url)),
            Err(StorageError::MissingCredentials) => {
                warn!("AWS credentials not available, no image link for {}", uin);
                Ok(None)
            }
            Err(e) => Err(DirectoryError::Storage(e)),
        }
    }

    pub async fn presigned_image_url_default(
        &self,
        uin: i64,
    ) -> Result<Option<String>, DirectoryError> {
        self.presigned_image_url(uin, DEFAULT_PRESIGN_EXPIRY).await
    }

    /// Upload a local image file as the candidate's image, replacing any existing one
    pub async fn upload_candidate_image(
        &self,
        uin: i64,
        image_path: &Path,
    ) -> Result<ImageUpload, DirectoryError> {
        let key = Self::image_key(uin);
        let image_url = self.storage.object_reference(&key)?;

        self.storage.upload_file(&key, image_path).await?;

        info!("Uploaded image for candidate {} to {}", uin, image_url);
        Ok(ImageUpload {
            message: "Image uploaded successfully".to_string(),
            image_url,
        })
    }

    /// Store a candidate, then upload its image when `image_url` names a local file
    ///
    /// The two steps are not atomic. If the upload fails after the item was
    /// written, the item stays and `DirectoryError::ImageUpload` is returned.
    pub async fn create_candidate(&self, candidate: &Candidate) -> Result<Mapping, DirectoryError> {
        let mapping = candidate.to_mapping();

        self.table.put_item(candidate.uin, mapping.clone()).await?;
        debug!("Stored candidate {}", candidate.uin);

        if candidate.has_image() {
            let key = Self::image_key(candidate.uin);
            self.storage
                .upload_file(&key, Path::new(&candidate.image_url))
                .await
                .map_err(|source| DirectoryError::ImageUpload {
                    uin: candidate.uin,
                    source,
                })?;
            debug!("Uploaded image {} for candidate {}", key, candidate.uin);
        }

        info!("Created candidate {}", candidate.uin);
        Ok(mapping)
    }

    /// Every stored candidate, in store order
    pub async fn list_candidates(&self) -> Result<Vec<Candidate>, DirectoryError> {
        let items = self.table.scan().await?;
        debug!("Scanned {} candidate items", items.len());

        items
            .iter()
            .map(|item| Candidate::from_mapping(item).map_err(DirectoryError::from))
            .collect()
    }
}
