use super::{CacheInvalidator, CatalogClient, OrderClient, Origin, REPLICATED_HEADER, REPLICATED_VALUE};
use crate::catalog::protocol::{ENDPOINT_INFO, ENDPOINT_SEARCH, ENDPOINT_UPDATE};
use crate::catalog::types::{Book, BookId, BookPatch};
use crate::error::{ServiceError, ServiceResult};
use crate::gateway::protocol::{ENDPOINT_CACHE_INVALIDATE, InvalidateResponse};
use crate::order::protocol::{
    ENDPOINT_PURCHASE, ENDPOINT_REPLICATE_ORDER, PurchaseResponse, ReplicationAck,
};
use crate::order::types::Order;

use async_trait::async_trait;
use serde::de::DeserializeOwned;

/// `reqwest`-backed implementation of every outbound role trait.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http_client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }

    async fn send<T: DeserializeOwned>(&self, request: reqwest::RequestBuilder) -> ServiceResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| ServiceError::Unreachable(format!("invalid response body: {}", e)));
        }

        let text = response.text().await.unwrap_or_default();
        let body = serde_json::from_str::<serde_json::Value>(&text)
            .unwrap_or_else(|_| serde_json::json!({ "error": text }));

        Err(ServiceError::Downstream {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl CatalogClient for HttpTransport {
    async fn search(&self, base_url: &str, topic: &str) -> ServiceResult<Vec<Book>> {
        let url = format!(
            "{}{}/{}",
            base_url,
            ENDPOINT_SEARCH,
            urlencoding::encode(topic)
        );
        self.send(self.http_client.get(url)).await
    }

    async fn info(&self, base_url: &str, id: BookId) -> ServiceResult<Book> {
        let url = format!("{}{}/{}", base_url, ENDPOINT_INFO, id);
        self.send(self.http_client.get(url)).await
    }

    async fn update(
        &self,
        base_url: &str,
        id: BookId,
        patch: &BookPatch,
        origin: Origin,
    ) -> ServiceResult<Book> {
        let url = format!("{}{}/{}", base_url, ENDPOINT_UPDATE, id);
        let mut request = self.http_client.patch(url).json(patch);
        if origin.is_replicated() {
            request = request.header(REPLICATED_HEADER, REPLICATED_VALUE);
        }
        self.send(request).await
    }
}

#[async_trait]
impl CacheInvalidator for HttpTransport {
    async fn invalidate(&self, base_url: &str, id: BookId) -> ServiceResult<InvalidateResponse> {
        let url = format!("{}{}/{}", base_url, ENDPOINT_CACHE_INVALIDATE, id);
        self.send(self.http_client.post(url)).await
    }
}

#[async_trait]
impl OrderClient for HttpTransport {
    async fn purchase(&self, base_url: &str, id: BookId) -> ServiceResult<PurchaseResponse> {
        let url = format!("{}{}/{}", base_url, ENDPOINT_PURCHASE, id);
        self.send(self.http_client.post(url)).await
    }

    async fn replicate(&self, base_url: &str, order: &Order) -> ServiceResult<ReplicationAck> {
        let url = format!("{}{}", base_url, ENDPOINT_REPLICATE_ORDER);
        let request = self
            .http_client
            .post(url)
            .header(REPLICATED_HEADER, REPLICATED_VALUE)
            .json(order);
        self.send(request).await
    }
}
