//! In-process doubles for the transport traits.
//!
//! - `FakeCatalog` / `FakeInvalidator` / `FakeOrderPeer`: scripted endpoints
//!   that record every call they receive.
//! - `LoopbackCatalog` / `LoopbackOrders` / `GatewayLink`: route calls
//!   straight into real service instances, so several replicas can talk to
//!   each other inside one test without sockets.

use super::{CacheInvalidator, CatalogClient, OrderClient, Origin};
use crate::catalog::service::CatalogReplica;
use crate::catalog::types::{Book, BookId, BookPatch};
use crate::error::{ServiceError, ServiceResult};
use crate::gateway::protocol::InvalidateResponse;
use crate::gateway::service::Gateway;
use crate::order::protocol::{PurchaseResponse, ReplicationAck};
use crate::order::service::OrderReplica;
use crate::order::types::{Order, OrderStatus};
use crate::storage::memory::MemoryStore;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Barrier;

pub fn book(id: BookId, title: &str, topic: &str, quantity: i64, price: f64) -> Book {
    Book {
        id,
        title: title.to_string(),
        topic: topic.to_string(),
        quantity,
        price,
    }
}

fn not_found() -> ServiceError {
    ServiceError::Downstream {
        status: 404,
        body: json!({ "error": "Book not found" }),
    }
}

fn refused() -> ServiceError {
    ServiceError::Unreachable("connection refused".to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub enum CatalogCall {
    Search {
        base_url: String,
        topic: String,
    },
    Info {
        base_url: String,
        id: BookId,
    },
    Update {
        base_url: String,
        id: BookId,
        patch: BookPatch,
        origin: Origin,
    },
}

// ============================================================
// SCRIPTED DOUBLES
// ============================================================

/// A catalog answering every base URL from one shared book table.
#[derive(Default)]
pub struct FakeCatalog {
    books: Mutex<HashMap<BookId, Book>>,
    calls: Mutex<Vec<CatalogCall>>,
    unreachable: AtomicBool,
    read_barrier: Option<Arc<Barrier>>,
}

impl FakeCatalog {
    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: Mutex::new(books.into_iter().map(|b| (b.id, b)).collect()),
            ..Default::default()
        }
    }

    /// Every `info` call waits on `barrier` after taking its snapshot, so
    /// concurrent readers all observe the state before anyone writes.
    pub fn with_read_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.read_barrier = Some(barrier);
        self
    }

    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().clone()
    }

    pub fn update_calls(&self) -> Vec<CatalogCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, CatalogCall::Update { .. }))
            .collect()
    }

    pub fn book(&self, id: BookId) -> Option<Book> {
        self.books.lock().get(&id).cloned()
    }

    fn check_reachable(&self) -> ServiceResult<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(refused());
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn search(&self, base_url: &str, topic: &str) -> ServiceResult<Vec<Book>> {
        self.calls.lock().push(CatalogCall::Search {
            base_url: base_url.to_string(),
            topic: topic.to_string(),
        });
        self.check_reachable()?;

        let needle = topic.to_lowercase();
        let mut found: Vec<Book> = self
            .books
            .lock()
            .values()
            .filter(|b| b.matches_topic(&needle))
            .cloned()
            .collect();
        found.sort_by_key(|b| b.id);
        Ok(found)
    }

    async fn info(&self, base_url: &str, id: BookId) -> ServiceResult<Book> {
        self.calls.lock().push(CatalogCall::Info {
            base_url: base_url.to_string(),
            id,
        });
        self.check_reachable()?;

        let snapshot = self.books.lock().get(&id).cloned();
        if let Some(barrier) = &self.read_barrier {
            barrier.wait().await;
        }
        snapshot.ok_or_else(not_found)
    }

    async fn update(
        &self,
        base_url: &str,
        id: BookId,
        patch: &BookPatch,
        origin: Origin,
    ) -> ServiceResult<Book> {
        self.calls.lock().push(CatalogCall::Update {
            base_url: base_url.to_string(),
            id,
            patch: patch.clone(),
            origin,
        });
        self.check_reachable()?;

        let mut books = self.books.lock();
        let book = books.get_mut(&id).ok_or_else(not_found)?;
        patch.apply_to(book);
        Ok(book.clone())
    }
}

/// Records invalidation signals. When watching a store, also records the
/// store contents at the moment each signal arrived.
#[derive(Default)]
pub struct FakeInvalidator {
    calls: Mutex<Vec<(String, BookId)>>,
    observed: Mutex<Vec<Vec<Book>>>,
    watched: Option<Arc<MemoryStore<Book>>>,
    fail: AtomicBool,
}

impl FakeInvalidator {
    pub fn watching(store: Arc<MemoryStore<Book>>) -> Self {
        Self {
            watched: Some(store),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        let fake = Self::default();
        fake.fail.store(true, Ordering::SeqCst);
        fake
    }

    pub fn calls(&self) -> Vec<(String, BookId)> {
        self.calls.lock().clone()
    }

    pub fn observed(&self) -> Vec<Vec<Book>> {
        self.observed.lock().clone()
    }
}

#[async_trait]
impl CacheInvalidator for FakeInvalidator {
    async fn invalidate(&self, base_url: &str, id: BookId) -> ServiceResult<InvalidateResponse> {
        self.calls.lock().push((base_url.to_string(), id));
        if let Some(store) = &self.watched {
            self.observed.lock().push(store.snapshot());
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(refused());
        }
        Ok(InvalidateResponse::new(id, false))
    }
}

/// An order replica endpoint that accepts everything it is sent.
#[derive(Default)]
pub struct FakeOrderPeer {
    replicated: Mutex<Vec<(String, Order)>>,
    purchases: Mutex<Vec<(String, BookId)>>,
    rejection: Mutex<Option<(u16, serde_json::Value)>>,
    unreachable: AtomicBool,
}

impl FakeOrderPeer {
    pub fn unreachable() -> Self {
        let fake = Self::default();
        fake.unreachable.store(true, Ordering::SeqCst);
        fake
    }

    /// Makes every purchase answer with this status and body.
    pub fn reject_purchases(&self, status: u16, body: serde_json::Value) {
        *self.rejection.lock() = Some((status, body));
    }

    pub fn replicated(&self) -> Vec<(String, Order)> {
        self.replicated.lock().clone()
    }

    pub fn purchases(&self) -> Vec<(String, BookId)> {
        self.purchases.lock().clone()
    }
}

#[async_trait]
impl OrderClient for FakeOrderPeer {
    async fn purchase(&self, base_url: &str, id: BookId) -> ServiceResult<PurchaseResponse> {
        let count = {
            let mut purchases = self.purchases.lock();
            purchases.push((base_url.to_string(), id));
            purchases.len() as u64
        };
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(refused());
        }
        if let Some((status, body)) = self.rejection.lock().clone() {
            return Err(ServiceError::Downstream { status, body });
        }

        let order = Order {
            id: count,
            book_id: id,
            book_title: format!("Book {}", id),
            price: 10.0,
            status: OrderStatus::Completed,
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
        };
        Ok(PurchaseResponse::new(order, 0))
    }

    async fn replicate(&self, base_url: &str, order: &Order) -> ServiceResult<ReplicationAck> {
        self.replicated
            .lock()
            .push((base_url.to_string(), order.clone()));
        if self.unreachable.load(Ordering::SeqCst) {
            return Err(refused());
        }
        Ok(ReplicationAck::new(order.id, false))
    }
}

// ============================================================
// LOOPBACK LINKS
// ============================================================

/// Routes catalog calls into registered `CatalogReplica`s by base URL.
#[derive(Default)]
pub struct LoopbackCatalog {
    routes: RwLock<HashMap<String, Arc<CatalogReplica>>>,
    calls: Mutex<Vec<CatalogCall>>,
}

impl LoopbackCatalog {
    pub fn register(&self, base_url: &str, replica: Arc<CatalogReplica>) {
        self.routes.write().insert(base_url.to_string(), replica);
    }

    pub fn calls(&self) -> Vec<CatalogCall> {
        self.calls.lock().clone()
    }

    pub fn update_calls_to(&self, base_url: &str) -> Vec<CatalogCall> {
        self.calls()
            .into_iter()
            .filter(|c| matches!(c, CatalogCall::Update { base_url: b, .. } if b == base_url))
            .collect()
    }

    fn route(&self, base_url: &str) -> ServiceResult<Arc<CatalogReplica>> {
        self.routes.read().get(base_url).cloned().ok_or_else(refused)
    }
}

#[async_trait]
impl CatalogClient for LoopbackCatalog {
    async fn search(&self, base_url: &str, topic: &str) -> ServiceResult<Vec<Book>> {
        self.calls.lock().push(CatalogCall::Search {
            base_url: base_url.to_string(),
            topic: topic.to_string(),
        });
        self.route(base_url)?.search(topic).await
    }

    async fn info(&self, base_url: &str, id: BookId) -> ServiceResult<Book> {
        self.calls.lock().push(CatalogCall::Info {
            base_url: base_url.to_string(),
            id,
        });
        self.route(base_url)?.info(id).await
    }

    async fn update(
        &self,
        base_url: &str,
        id: BookId,
        patch: &BookPatch,
        origin: Origin,
    ) -> ServiceResult<Book> {
        self.calls.lock().push(CatalogCall::Update {
            base_url: base_url.to_string(),
            id,
            patch: patch.clone(),
            origin,
        });
        self.route(base_url)?.update(id, patch.clone(), origin).await
    }
}

/// Routes order calls into registered `OrderReplica`s by base URL.
#[derive(Default)]
pub struct LoopbackOrders {
    routes: RwLock<HashMap<String, Arc<OrderReplica>>>,
    replications: Mutex<Vec<(String, Order)>>,
}

impl LoopbackOrders {
    pub fn register(&self, base_url: &str, replica: Arc<OrderReplica>) {
        self.routes.write().insert(base_url.to_string(), replica);
    }

    pub fn replications(&self) -> Vec<(String, Order)> {
        self.replications.lock().clone()
    }

    fn route(&self, base_url: &str) -> ServiceResult<Arc<OrderReplica>> {
        self.routes.read().get(base_url).cloned().ok_or_else(refused)
    }
}

#[async_trait]
impl OrderClient for LoopbackOrders {
    async fn purchase(&self, base_url: &str, id: BookId) -> ServiceResult<PurchaseResponse> {
        self.route(base_url)?.purchase(id, Origin::Client).await
    }

    async fn replicate(&self, base_url: &str, order: &Order) -> ServiceResult<ReplicationAck> {
        self.replications
            .lock()
            .push((base_url.to_string(), order.clone()));
        self.route(base_url)?.accept_replicated(order.clone()).await
    }
}

/// Delivers invalidation signals straight to a `Gateway`.
pub struct GatewayLink {
    gateway: RwLock<Option<Arc<Gateway>>>,
}

impl GatewayLink {
    pub fn new() -> Self {
        Self {
            gateway: RwLock::new(None),
        }
    }

    pub fn connect(&self, gateway: Arc<Gateway>) {
        *self.gateway.write() = Some(gateway);
    }
}

#[async_trait]
impl CacheInvalidator for GatewayLink {
    async fn invalidate(&self, _base_url: &str, id: BookId) -> ServiceResult<InvalidateResponse> {
        let gateway = self.gateway.read().clone().ok_or_else(refused)?;
        Ok(gateway.invalidate(id))
    }
}
