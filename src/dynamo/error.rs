use thiserror::Error;

/// Errors that can occur when interacting with the candidate table
#[derive(Error, Debug)]
pub enum TableError {
    #[error("Failed to connect to table store: {0}")]
    ConnectionError(String),

    #[error("Table {0} does not exist")]
    TableNotFound(String),

    #[error("Access denied for table {0}: {1}")]
    AccessDenied(String, String),

    #[error("Table operation failed: {0}")]
    QueryError(String),

    #[error("Failed to convert item: {0}")]
    ConversionError(String),

    #[error("Other table error: {0}")]
    Other(#[from] anyhow::Error),
}
