use crate::candidate::CandidateError;
use crate::dynamo::TableError;
use crate::s3::StorageError;
use thiserror::Error;

/// Errors surfaced by candidate directory operations
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Candidate table error: {0}")]
    Table(#[from] TableError),

    #[error("Image storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Malformed candidate record: {0}")]
    MalformedRecord(#[from] CandidateError),

    /// The candidate item was written but its image was not uploaded
    #[error("Candidate {uin} was stored but its image upload failed: {source}")]
    ImageUpload {
        uin: i64,
        #[source]
        source: StorageError,
    },
}
