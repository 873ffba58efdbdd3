//! Gateway Read Cache
//!
//! A bounded key-value map with insertion-order eviction, used only on the
//! gateway's info-by-id read path.
//!
//! ## Rules
//! - Populated only by successful reads (cache-miss fetches).
//! - `put` inserts or refreshes the entry at the most-recent position, then
//!   evicts from the oldest end while the map exceeds its capacity.
//! - Entries are removed by explicit invalidation signals pushed from the
//!   catalog replicas before they write.
//! - Search results and every write path bypass the cache entirely.
//!
//! Capacity and the enabled flag are fixed at construction. A disabled cache
//! never stores anything and always misses.

use indexmap::IndexMap;
use parking_lot::Mutex;

/// Key under which the info-by-id response for `id` is cached.
pub fn info_key(id: impl std::fmt::Display) -> String {
    format!("info:{}", id)
}

#[derive(Debug)]
pub struct InfoCache<V> {
    enabled: bool,
    capacity: usize,
    entries: Mutex<IndexMap<String, V>>,
}

impl<V: Clone> InfoCache<V> {
    pub fn new(enabled: bool, capacity: usize) -> Self {
        Self {
            enabled,
            capacity,
            entries: Mutex::new(IndexMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<V> {
        if !self.enabled {
            return None;
        }
        self.entries.lock().get(key).cloned()
    }

    /// Inserts or refreshes `key` and returns the cache size afterwards.
    pub fn put(&self, key: String, value: V) -> usize {
        if !self.enabled {
            return 0;
        }
        let mut entries = self.entries.lock();
        // A refresh must move the key to the newest position.
        entries.shift_remove(&key);
        entries.insert(key, value);
        while entries.len() > self.capacity {
            if entries.shift_remove_index(0).is_none() {
                break;
            }
        }
        entries.len()
    }

    /// Removes `key`, reporting whether an entry existed.
    pub fn invalidate(&self, key: &str) -> bool {
        self.entries.lock().shift_remove(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from oldest to newest insertion.
    pub fn keys(&self) -> Vec<String> {
        self.entries.lock().keys().cloned().collect()
    }
}
