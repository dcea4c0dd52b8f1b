use thiserror::Error;

/// Errors that can occur when interacting with the image store
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("S3 bucket name is not configured (set AWS_S3_BUCKET_NAME)")]
    BucketNotConfigured,

    #[error("AWS credentials not available")]
    MissingCredentials,

    #[error("Object with key {0} not found")]
    ObjectNotFound(String),

    #[error("Access denied for object {0}: {1}")]
    AccessDenied(String, String),

    #[error("Failed to write object {0}: {1}")]
    WriteError(String, String),

    #[error("Failed to presign object {0}: {1}")]
    PresignError(String, String),

    #[error("Failed to read local file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Other storage error: {0}")]
    Other(#[from] anyhow::Error),
}
