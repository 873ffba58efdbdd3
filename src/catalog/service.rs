use super::types::{Book, BookId, BookPatch};
use crate::dispatcher::normalize_base_url;
use crate::error::{ServiceError, ServiceResult};
use crate::storage::RecordStore;
use crate::transport::{CacheInvalidator, CatalogClient, Origin};

use std::sync::Arc;
use tokio::sync::Mutex;

/// One catalog replica: a local book store plus the links needed to keep the
/// gateway cache and the peer replica informed of writes.
pub struct CatalogReplica {
    store: Arc<dyn RecordStore<Book>>,
    peer_client: Arc<dyn CatalogClient>,
    invalidator: Arc<dyn CacheInvalidator>,
    peer_url: Option<String>,
    gateway_url: Option<String>,
    apply_guard: Mutex<()>,
}

impl CatalogReplica {
    pub fn new(
        store: Arc<dyn RecordStore<Book>>,
        peer_client: Arc<dyn CatalogClient>,
        invalidator: Arc<dyn CacheInvalidator>,
    ) -> Self {
        Self {
            store,
            peer_client,
            invalidator,
            peer_url: None,
            gateway_url: None,
            apply_guard: Mutex::new(()),
        }
    }

    pub fn with_peer(mut self, peer_url: Option<String>) -> Self {
        self.peer_url = configured_url(peer_url);
        self
    }

    pub fn with_gateway(mut self, gateway_url: Option<String>) -> Self {
        self.gateway_url = configured_url(gateway_url);
        self
    }

    pub fn gateway_url(&self) -> Option<&str> {
        self.gateway_url.as_deref()
    }

    pub async fn list(&self) -> ServiceResult<Vec<Book>> {
        Ok(self.store.load().await?)
    }

    pub async fn search(&self, topic: &str) -> ServiceResult<Vec<Book>> {
        let needle = topic.to_lowercase();
        let results: Vec<Book> = self
            .store
            .load()
            .await?
            .into_iter()
            .filter(|book| book.matches_topic(&needle))
            .collect();

        tracing::info!("Search for {:?}: found {} books", needle, results.len());
        Ok(results)
    }

    pub async fn info(&self, id: BookId) -> ServiceResult<Book> {
        let book = self
            .store
            .load()
            .await?
            .into_iter()
            .find(|book| book.id == id)
            .ok_or(ServiceError::NotFound("Book"))?;

        tracing::info!("Info request for book {}: {:?}", id, book.title);
        Ok(book)
    }

    /// Write path: invalidate the gateway cache, apply locally, then forward
    /// to the peer unless this write was itself forwarded.
    ///
    /// Invalidation and the local write are separate steps with no shared
    /// lock, so a gateway read landing between them can still cache the old
    /// value.
    pub async fn update(&self, id: BookId, patch: BookPatch, origin: Origin) -> ServiceResult<Book> {
        self.signal_invalidation(id).await;

        let book = self.apply(id, &patch).await?;

        if !origin.is_replicated() {
            self.forward_to_peer(id, &patch).await;
        }

        tracing::info!(
            "Updated book {}: quantity={} price={} (origin={:?})",
            id,
            book.quantity,
            book.price,
            origin
        );
        Ok(book)
    }

    async fn signal_invalidation(&self, id: BookId) {
        let Some(gateway_url) = self.gateway_url.as_deref() else {
            return;
        };

        match self.invalidator.invalidate(gateway_url, id).await {
            Ok(ack) => {
                tracing::info!(
                    "Sent cache invalidation for book {} (existed: {})",
                    id,
                    ack.existed
                );
            }
            Err(e) => {
                tracing::warn!("Cache invalidation failed for book {}: {}", id, e);
            }
        }
    }

    async fn apply(&self, id: BookId, patch: &BookPatch) -> ServiceResult<Book> {
        let _guard = self.apply_guard.lock().await;

        let mut books = self.store.load().await?;
        let book = books
            .iter_mut()
            .find(|book| book.id == id)
            .ok_or(ServiceError::NotFound("Book"))?;

        patch.apply_to(book);
        let updated = book.clone();

        self.store.save(&books).await.map_err(|e| {
            tracing::error!("Failed to persist catalog after updating book {}: {}", id, e);
            ServiceError::Storage(e)
        })?;

        Ok(updated)
    }

    async fn forward_to_peer(&self, id: BookId, patch: &BookPatch) {
        let Some(peer_url) = self.peer_url.as_deref() else {
            return;
        };

        match self
            .peer_client
            .update(peer_url, id, patch, Origin::Replica)
            .await
        {
            Ok(_) => tracing::info!("Replicated update of book {} to peer {}", id, peer_url),
            Err(e) => tracing::warn!("Replication of book {} to peer {} failed: {}", id, peer_url, e),
        }
    }
}

pub(crate) fn configured_url(url: Option<String>) -> Option<String> {
    url.map(|u| normalize_base_url(&u)).filter(|u| !u.is_empty())
}
