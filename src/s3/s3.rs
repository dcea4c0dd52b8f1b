use crate::config::AwsConfig;
use crate::s3::error::StorageError;
use crate::s3::storage::Storage;
use async_trait::async_trait;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{BehaviorVersion, Region};
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use std::time::Duration;
use tracing::{debug, info};

/// Real S3 implementation of the Storage trait
#[derive(Clone)]
pub struct S3Storage {
    client: Client,
    bucket: Option<String>,
    has_credentials: bool,
}

impl S3Storage {
    /// Create a new S3Storage instance from configuration
    ///
    /// No request is sent here. A missing bucket name is reported by the
    /// first operation that needs it.
    pub fn new(config: &AwsConfig) -> Self {
        info!(
            "Creating S3Storage: endpoint={:?}, region={}, bucket={:?}",
            config.endpoint,
            config.region(),
            config.s3_bucket
        );

        let mut s3_config_builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region().to_string()));

        let has_credentials = if let Some((access_key, secret_key)) = config.credentials() {
            let credentials = Credentials::new(
                access_key,
                secret_key,
                None,
                None,
                "StaticCredentialsProvider",
            );
            s3_config_builder = s3_config_builder.credentials_provider(credentials);
            true
        } else {
            false
        };

        if let Some(endpoint) = &config.endpoint {
            info!("Setting custom S3 endpoint: {}", endpoint);
            // LocalStack and MinIO require path-style requests
            s3_config_builder = s3_config_builder
                .endpoint_url(endpoint)
                .force_path_style(true);
        }

        let client = Client::from_conf(s3_config_builder.build());

        Self {
            client,
            bucket: config.s3_bucket.clone(),
            has_credentials,
        }
    }
}

fn classify_error<E>(key: &str, err: &aws_sdk_s3::error::SdkError<E>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let detail = DisplayErrorContext(err).to_string();
    match err.code() {
        Some("NoSuchKey") | Some("NotFound") => StorageError::ObjectNotFound(key.to_string()),
        Some("AccessDenied") => StorageError::AccessDenied(key.to_string(), detail),
        _ => StorageError::WriteError(key.to_string(), detail),
    }
}

#[async_trait]
impl Storage for S3Storage {
    fn bucket(&self) -> Result<&str, StorageError> {
        self.bucket
            .as_deref()
            .ok_or(StorageError::BucketNotConfigured)
    }

    async fn put_object(&self, key: &str, data: Bytes) -> Result<(), StorageError> {
        let bucket = self.bucket()?;
        debug!("Uploading {} bytes to s3://{}/{}", data.len(), bucket, key);

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(data))
            .send()
            .await
            .map_err(|e| classify_error(key, &e))?;

        debug!("Successfully uploaded object: {}", key);
        Ok(())
    }

    async fn presigned_get_url(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let bucket = self.bucket()?;

        if !self.has_credentials {
            return Err(StorageError::MissingCredentials);
        }

        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::PresignError(key.to_string(), e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::PresignError(key.to_string(), DisplayErrorContext(&e).to_string()))?;

        debug!("Presigned GET for s3://{}/{} ({}s)", bucket, key, expires_in.as_secs());
        Ok(request.uri().to_string())
    }

    #[cfg(test)]
    async fn get_object(&self, key: &str) -> Result<Bytes, StorageError> {
        let bucket = self.bucket()?;

        let response = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| classify_error(key, &e))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| {
                StorageError::Other(anyhow::anyhow!("Failed to read object '{}': {}", key, e))
            })?
            .into_bytes();

        Ok(data)
    }

    #[cfg(test)]
    async fn remove_object(&self, key: &str) -> Result<(), StorageError> {
        let bucket = self.bucket()?;

        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                StorageError::Other(anyhow::anyhow!("Failed to delete object '{}': {}", key, e))
            })?;

        debug!("Successfully removed object: {}", key);
        Ok(())
    }

    #[cfg(test)]
    async fn has_bucket(&self, bucket: &str) -> Result<bool, StorageError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) => match e.code() {
                Some("NoSuchBucket") | Some("NotFound") => Ok(false),
                _ if e.to_string().contains("404") => Ok(false),
                _ => Err(StorageError::Other(anyhow::anyhow!(
                    "Error checking bucket existence: {}",
                    DisplayErrorContext(&e)
                ))),
            },
        }
    }

    #[cfg(test)]
    async fn create_bucket(&self, bucket: &str) -> Result<(), StorageError> {
        info!("Creating bucket '{}'", bucket);

        match self.client.create_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(()),
            Err(e) => match e.code() {
                Some("BucketAlreadyExists") | Some("BucketAlreadyOwnedByYou") => Ok(()),
                _ => Err(StorageError::Other(anyhow::anyhow!(
                    "Failed to create bucket '{}': {}",
                    bucket,
                    DisplayErrorContext(&e)
                ))),
            },
        }
    }
}
