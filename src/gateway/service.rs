use super::protocol::{EndpointList, InvalidateResponse, ServiceDescription};
use crate::cache::{InfoCache, info_key};
use crate::catalog::types::{Book, BookId};
use crate::dispatcher::ReplicaSet;
use crate::error::{ServiceError, ServiceResult};
use crate::order::protocol::PurchaseResponse;
use crate::transport::{CatalogClient, OrderClient};

use std::sync::Arc;

/// Public entry point fronting the catalog and order replica sets.
pub struct Gateway {
    catalog_replicas: ReplicaSet,
    order_replicas: ReplicaSet,
    cache: InfoCache<Book>,
    catalog_client: Arc<dyn CatalogClient>,
    order_client: Arc<dyn OrderClient>,
}

impl Gateway {
    pub fn new(
        catalog_replicas: ReplicaSet,
        order_replicas: ReplicaSet,
        cache: InfoCache<Book>,
        catalog_client: Arc<dyn CatalogClient>,
        order_client: Arc<dyn OrderClient>,
    ) -> Self {
        Self {
            catalog_replicas,
            order_replicas,
            cache,
            catalog_client,
            order_client,
        }
    }

    pub fn cache(&self) -> &InfoCache<Book> {
        &self.cache
    }

    /// Topic search. Never cached: results are not keyed by a single id.
    pub async fn search(&self, topic: &str) -> ServiceResult<Vec<Book>> {
        let target = self.catalog_replicas.next();
        tracing::info!("Search request for topic {:?} via {}", topic, target);

        match self.catalog_client.search(target, topic).await {
            Ok(books) => {
                tracing::info!("Search successful, found {} books", books.len());
                Ok(books)
            }
            Err(e) => {
                tracing::error!("Search for {:?} failed: {}", topic, e);
                Err(ServiceError::Internal("Internal server error"))
            }
        }
    }

    /// Info by id, served from the cache when possible and cached on a miss.
    pub async fn info(&self, id: BookId) -> ServiceResult<Book> {
        let key = info_key(id);

        if let Some(book) = self.cache.get(&key) {
            tracing::info!("Cache HIT for book {}", id);
            return Ok(book);
        }
        if self.cache.is_enabled() {
            tracing::info!("Cache MISS for book {}", id);
        }

        let target = self.catalog_replicas.next();
        let book = self
            .catalog_client
            .info(target, id)
            .await
            .map_err(|e| {
                if e.is_not_found() {
                    return ServiceError::NotFound("Book");
                }
                tracing::error!("Info for book {} failed: {}", id, e);
                ServiceError::Internal("Internal server error")
            })?;

        tracing::info!("Info retrieved for {:?} via {}", book.title, target);

        if self.cache.is_enabled() {
            let size = self.cache.put(key, book.clone());
            tracing::info!("Cached info for book {} (cache size: {})", id, size);
        }

        Ok(book)
    }

    /// Purchase. Write traffic never reads from or populates the cache;
    /// invalidation is driven by the catalog replicas themselves.
    pub async fn purchase(&self, id: BookId) -> ServiceResult<PurchaseResponse> {
        let target = self.order_replicas.next();
        tracing::info!("Purchase request for book {} via {}", id, target);

        match self.order_client.purchase(target, id).await {
            Ok(response) => {
                tracing::info!("Purchase successful, order {}", response.order.id);
                Ok(response)
            }
            Err(e @ ServiceError::Downstream { .. }) => {
                tracing::warn!("Purchase of book {} rejected downstream: {}", id, e);
                Err(e)
            }
            Err(e) => {
                tracing::error!("Purchase of book {} failed: {}", id, e);
                Err(ServiceError::Internal("Internal server error"))
            }
        }
    }

    pub fn invalidate(&self, id: BookId) -> InvalidateResponse {
        let existed = self.cache.invalidate(&info_key(id));
        tracing::info!("Cache invalidate for book {}: existed={}", id, existed);
        InvalidateResponse::new(id, existed)
    }

    pub fn describe(&self) -> ServiceDescription {
        ServiceDescription {
            message: "Welcome to the storefront API".to_string(),
            endpoints: EndpointList::default(),
            cache_enabled: self.cache.is_enabled(),
            cache_max: self.cache.capacity(),
            catalog_replicas: self.catalog_replicas.addresses(),
            order_replicas: self.order_replicas.addresses(),
        }
    }
}
