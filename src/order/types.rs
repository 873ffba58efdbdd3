use crate::catalog::types::{Book, BookId};

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

pub type OrderId = u64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Completed,
}

/// A finished purchase. Created once by the replica that executed the
/// purchase and propagated verbatim to its peer; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub book_id: BookId,
    pub book_title: String,
    pub price: f64,
    pub status: OrderStatus,
    /// RFC 3339, UTC, millisecond precision.
    pub timestamp: String,
}

impl Order {
    pub fn completed(id: OrderId, book: &Book) -> Self {
        Self {
            id,
            book_id: book.id,
            book_title: book.title.clone(),
            price: book.price,
            status: OrderStatus::Completed,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Process-local order id allocator.
///
/// Starts one past the largest id in the local store and is fast-forwarded
/// past every replicated order accepted from the peer, so the two replicas'
/// sequences never hand out an id the other side has already used.
#[derive(Debug)]
pub struct OrderIdSequence {
    next: AtomicU64,
}

impl OrderIdSequence {
    pub fn starting_after(max_existing: Option<OrderId>) -> Self {
        Self {
            next: AtomicU64::new(max_existing.map_or(1, |max| max + 1)),
        }
    }

    pub fn next(&self) -> OrderId {
        self.next.fetch_add(1, Ordering::SeqCst)
    }

    /// Ensures the next allocated id is greater than `id`.
    pub fn advance_past(&self, id: OrderId) {
        self.next.fetch_max(id.saturating_add(1), Ordering::SeqCst);
    }

    pub fn peek(&self) -> OrderId {
        self.next.load(Ordering::SeqCst)
    }
}
