//! Record Store Module
//!
//! Each replica owns an independent, durable collection of records. The store
//! contract is coarse:
//!
//! - **`load`** returns the full collection.
//! - **`save`** persists the full collection, atomically from the caller's
//!   point of view (a reader never observes a half-written file).
//!
//! There is no shared storage between replicas; convergence is the job of the
//! replication protocol in `catalog` and `order`, not of this layer.
//!
//! ## Implementations
//! - **`file::JsonFileStore`**: pretty-printed JSON array on disk, replaced via
//!   temp file + rename. Optionally seeded from a template file on first run.
//! - **`memory::MemoryStore`**: in-process vector, for tests and throwaway replicas.

pub mod file;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait RecordStore<T>: Send + Sync
where
    T: Send + Sync,
{
    async fn load(&self) -> Result<Vec<T>>;

    async fn save(&self, records: &[T]) -> Result<()>;
}
