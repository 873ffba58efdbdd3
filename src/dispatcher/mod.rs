//! Replica Dispatcher
//!
//! Round-robin selection over a fixed list of replica base addresses.
//!
//! ## Behaviour
//! - `next()` returns the address under the cursor and advances it, wrapping
//!   modulo the list length. It can be called without bound.
//! - With no configured list, `next()` always returns the fallback address.
//! - There is no health checking: an unreachable replica is still handed out
//!   in its turn and the failure surfaces to whoever makes the network call.
//!
//! Each `ReplicaSet` owns its own cursor, so a gateway keeps one set for
//! catalog replicas and an independent one for order replicas.

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug)]
pub struct ReplicaSet {
    addresses: Vec<String>,
    fallback: String,
    cursor: AtomicUsize,
}

impl ReplicaSet {
    /// Builds a set from an optional list of base addresses.
    ///
    /// Entries are trimmed, empty entries are dropped and trailing slashes are
    /// stripped. If nothing usable remains the set degrades to `fallback`.
    pub fn configure<I, S>(list: Option<I>, fallback: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addresses = list
            .map(|items| {
                items
                    .into_iter()
                    .map(|s| normalize_base_url(s.as_ref()))
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            addresses,
            fallback: normalize_base_url(fallback),
            cursor: AtomicUsize::new(0),
        }
    }

    /// Builds a set from a comma-separated list such as
    /// `"http://catalog1:4000, http://catalog2:4000"`.
    pub fn from_list_str(list: Option<&str>, fallback: &str) -> Self {
        Self::configure(list.map(|s| s.split(',')), fallback)
    }

    pub fn next(&self) -> &str {
        if self.addresses.is_empty() {
            return &self.fallback;
        }
        let idx = self.cursor.fetch_add(1, Ordering::Relaxed) % self.addresses.len();
        &self.addresses[idx]
    }

    /// The effective candidate list: the configured addresses, or the
    /// fallback alone when none were configured.
    pub fn addresses(&self) -> Vec<String> {
        if self.addresses.is_empty() {
            vec![self.fallback.clone()]
        } else {
            self.addresses.clone()
        }
    }

    pub fn is_fallback_only(&self) -> bool {
        self.addresses.is_empty()
    }
}

pub fn normalize_base_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
