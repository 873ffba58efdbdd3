use super::protocol::{PurchaseResponse, ReplicationAck};
use super::types::{Order, OrderId, OrderIdSequence};
use crate::catalog::service::configured_url;
use crate::catalog::types::{BookId, BookPatch};
use crate::dispatcher::ReplicaSet;
use crate::error::{ServiceError, ServiceResult};
use crate::storage::RecordStore;
use crate::transport::{CatalogClient, OrderClient, Origin};

use anyhow::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// One order replica: an in-memory order log mirrored to the local store,
/// a dispatcher over the catalog replicas, and a link to the peer replica.
pub struct OrderReplica {
    store: Arc<dyn RecordStore<Order>>,
    orders: Mutex<Vec<Order>>,
    sequence: OrderIdSequence,
    catalog_replicas: ReplicaSet,
    catalog_client: Arc<dyn CatalogClient>,
    peer_client: Arc<dyn OrderClient>,
    peer_url: Option<String>,
}

impl OrderReplica {
    /// Loads the local order log and starts the id sequence after its
    /// largest id.
    pub async fn open(
        store: Arc<dyn RecordStore<Order>>,
        catalog_replicas: ReplicaSet,
        catalog_client: Arc<dyn CatalogClient>,
        peer_client: Arc<dyn OrderClient>,
    ) -> Result<Self> {
        let orders = store.load().await?;
        let sequence = OrderIdSequence::starting_after(orders.iter().map(|o| o.id).max());

        tracing::info!(
            "Loaded {} orders, next order id {}",
            orders.len(),
            sequence.peek()
        );

        Ok(Self {
            store,
            orders: Mutex::new(orders),
            sequence,
            catalog_replicas,
            catalog_client,
            peer_client,
            peer_url: None,
        })
    }

    pub fn with_peer(mut self, peer_url: Option<String>) -> Self {
        self.peer_url = configured_url(peer_url);
        self
    }

    pub fn sequence(&self) -> &OrderIdSequence {
        &self.sequence
    }

    pub async fn list(&self) -> Vec<Order> {
        self.orders.lock().await.clone()
    }

    pub async fn get(&self, id: OrderId) -> ServiceResult<Order> {
        self.orders
            .lock()
            .await
            .iter()
            .find(|order| order.id == id)
            .cloned()
            .ok_or(ServiceError::NotFound("Order"))
    }

    /// Buys one copy of `book_id`.
    ///
    /// Stock is read and then decremented through two independent calls to
    /// the same catalog replica; nothing is reserved in between, so two
    /// concurrent purchases can both see the last copy and both succeed.
    pub async fn purchase(&self, book_id: BookId, origin: Origin) -> ServiceResult<PurchaseResponse> {
        let target = self.catalog_replicas.next().to_string();

        let book = self
            .catalog_client
            .info(&target, book_id)
            .await
            .map_err(|e| purchase_failure(book_id, e))?;

        tracing::info!(
            "Purchase request for {:?}: current quantity {} (catalog {})",
            book.title,
            book.quantity,
            target
        );

        if book.quantity <= 0 {
            return Err(ServiceError::OutOfStock);
        }

        let remaining = book.quantity - 1;
        self.catalog_client
            .update(&target, book_id, &BookPatch::quantity(remaining), Origin::Client)
            .await
            .map_err(|e| purchase_failure(book_id, e))?;

        let order = Order::completed(self.sequence.next(), &book);
        self.append(order.clone()).await?;

        if !origin.is_replicated() {
            self.replicate_to_peer(&order).await;
        }

        tracing::info!(
            "Purchase successful: order {}, remaining quantity {}",
            order.id,
            remaining
        );
        Ok(PurchaseResponse::new(order, remaining))
    }

    /// Accepts an order pushed by the peer. Receiving the same id twice is a
    /// no-op reported with `existed: true`.
    pub async fn accept_replicated(&self, order: Order) -> ServiceResult<ReplicationAck> {
        let mut orders = self.orders.lock().await;

        if orders.iter().any(|existing| existing.id == order.id) {
            tracing::warn!("Replicated order {} already exists (ignored)", order.id);
            return Ok(ReplicationAck::new(order.id, true));
        }

        let id = order.id;
        let mut next = orders.clone();
        next.push(order);
        self.store.save(&next).await.map_err(|e| {
            tracing::error!("Failed to persist replicated order {}: {}", id, e);
            ServiceError::Storage(e)
        })?;
        *orders = next;

        self.sequence.advance_past(id);

        tracing::info!("Received replicated order {} and saved locally", id);
        Ok(ReplicationAck::new(id, false))
    }

    async fn append(&self, order: Order) -> ServiceResult<()> {
        let mut orders = self.orders.lock().await;

        let id = order.id;
        let mut next = orders.clone();
        next.push(order);
        self.store.save(&next).await.map_err(|e| {
            tracing::error!("Failed to persist order {}: {}", id, e);
            ServiceError::Storage(e)
        })?;
        *orders = next;

        Ok(())
    }

    async fn replicate_to_peer(&self, order: &Order) {
        let Some(peer_url) = self.peer_url.as_deref() else {
            return;
        };

        match self.peer_client.replicate(peer_url, order).await {
            Ok(ack) => tracing::info!(
                "Replicated order {} to peer {} (existed: {})",
                order.id,
                peer_url,
                ack.existed
            ),
            Err(e) => tracing::warn!(
                "Order replication failed for order {} to {}: {}",
                order.id,
                peer_url,
                e
            ),
        }
    }
}

fn purchase_failure(book_id: BookId, err: ServiceError) -> ServiceError {
    if err.is_not_found() {
        return ServiceError::NotFound("Book");
    }
    tracing::error!("Purchase of book {} failed: {}", book_id, err);
    ServiceError::Internal("Purchase failed")
}
