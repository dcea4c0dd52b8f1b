use crate::candidate::Mapping;
use crate::dynamo::error::TableError;
use crate::dynamo::table::Table;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// A fake in-memory implementation of the Table trait
#[derive(Clone)]
pub struct FakeTable {
    name: String,
    items: Arc<Mutex<HashMap<i64, Mapping>>>,
    fail_writes: Arc<AtomicBool>,
    fail_scans: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl FakeTable {
    /// Create a new empty FakeTable
    pub fn new(name: &str) -> Self {
        FakeTable {
            name: name.to_string(),
            items: Arc::new(Mutex::new(HashMap::new())),
            fail_writes: Arc::new(AtomicBool::new(false)),
            fail_scans: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Store an item as-is, bypassing any shape the directory would write
    pub async fn fake_add_raw_item(&self, key: i64, item: Mapping) {
        let mut items = self.items.lock().await;
        items.insert(key, item);
    }

    /// Make every following `put_item` fail
    pub fn fake_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every following `scan` fail
    pub fn fake_fail_scans(&self, fail: bool) {
        self.fail_scans.store(fail, Ordering::SeqCst);
    }

    /// Number of stored items
    pub async fn fake_item_count(&self) -> usize {
        self.items.lock().await.len()
    }
}

#[async_trait]
impl Table for FakeTable {
    async fn put_item(&self, key: i64, item: Mapping) -> Result<(), TableError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(TableError::QueryError(format!(
                "Simulated write failure on table {}",
                self.name
            )));
        }

        let mut items = self.items.lock().await;
        items.insert(key, item);
        Ok(())
    }

    async fn scan(&self) -> Result<Vec<Mapping>, TableError> {
        if self.fail_scans.load(Ordering::SeqCst) {
            return Err(TableError::QueryError(format!(
                "Simulated scan failure on table {}",
                self.name
            )));
        }

        let items = self.items.lock().await;
        Ok(items.values().cloned().collect())
    }

    #[cfg(test)]
    async fn get_item(&self, key: i64) -> Result<Option<Mapping>, TableError> {
        let items = self.items.lock().await;
        Ok(items.get(&key).cloned())
    }

    #[cfg(test)]
    async fn delete_item(&self, key: i64) -> Result<(), TableError> {
        let mut items = self.items.lock().await;
        items.remove(&key);
        Ok(())
    }

    #[cfg(test)]
    async fn has_table(&self) -> Result<bool, TableError> {
        Ok(true)
    }

    #[cfg(test)]
    async fn create_table(&self) -> Result<(), TableError> {
        Ok(())
    }
}
