use super::RecordStore;

use anyhow::Result;
use async_trait::async_trait;
use parking_lot::RwLock;

/// Volatile store holding the collection in process memory.
pub struct MemoryStore<T> {
    records: RwLock<Vec<T>>,
}

impl<T: Clone> MemoryStore<T> {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    pub fn with_records(records: Vec<T>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.records.read().clone()
    }
}

impl<T: Clone> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T> RecordStore<T> for MemoryStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn load(&self) -> Result<Vec<T>> {
        Ok(self.records.read().clone())
    }

    async fn save(&self, records: &[T]) -> Result<()> {
        *self.records.write() = records.to_vec();
        Ok(())
    }
}
