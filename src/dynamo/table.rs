use crate::candidate::Mapping;
use crate::dynamo::error::TableError;
use async_trait::async_trait;
use std::sync::Arc;

/// Table trait defining the interface for the key-value store holding candidate items
#[async_trait]
pub trait Table: Send + Sync + 'static {
    /// Write an item under `key`, replacing any previous item with that key
    ///
    /// * `key` - The candidate `uin`
    /// * `item` - The flat candidate mapping
    async fn put_item(&self, key: i64, item: Mapping) -> Result<(), TableError>;

    /// Read every item in the table, in no particular order
    async fn scan(&self) -> Result<Vec<Mapping>, TableError>;

    /// Get a single item by key (test-only)
    #[cfg(test)]
    async fn get_item(&self, key: i64) -> Result<Option<Mapping>, TableError>;

    /// Delete an item by key (test-only)
    #[cfg(test)]
    async fn delete_item(&self, key: i64) -> Result<(), TableError>;

    /// Check if the bound table exists (test-only)
    #[cfg(test)]
    async fn has_table(&self) -> Result<bool, TableError>;

    /// Create the bound table keyed on `uin` (test-only)
    #[cfg(test)]
    async fn create_table(&self) -> Result<(), TableError>;
}

/// Implementation of Table trait for Arc<T> where T implements Table
#[async_trait]
impl<T: Table + ?Sized> Table for Arc<T> {
    async fn put_item(&self, key: i64, item: Mapping) -> Result<(), TableError> {
        (**self).put_item(key, item).await
    }

    async fn scan(&self) -> Result<Vec<Mapping>, TableError> {
        (**self).scan().await
    }

    #[cfg(test)]
    async fn get_item(&self, key: i64) -> Result<Option<Mapping>, TableError> {
        (**self).get_item(key).await
    }

    #[cfg(test)]
    async fn delete_item(&self, key: i64) -> Result<(), TableError> {
        (**self).delete_item(key).await
    }

    #[cfg(test)]
    async fn has_table(&self) -> Result<bool, TableError> {
        (**self).has_table().await
    }

    #[cfg(test)]
    async fn create_table(&self) -> Result<(), TableError> {
        (**self).create_table().await
    }
}
