//! Inter-Service Transport
//!
//! Outbound calls between the three service roles are expressed as narrow
//! traits, one per callee role, so each service can be wired to the real HTTP
//! client in production and to in-process doubles in tests.
//!
//! ## Forwarding marker
//! A write that one replica forwards to its peer carries the header
//! `X-Replicated: 1`. Its presence is the only thing that stops the receiving
//! replica from forwarding the write back again; there is no other
//! deduplication of replicated updates.
//!
//! ## Failure model
//! One attempt per call, no timeout, no retry. A network failure comes back as
//! `ServiceError::Unreachable`; a non-success HTTP answer comes back as
//! `ServiceError::Downstream` carrying the status and JSON body untouched.

pub mod http;

#[cfg(test)]
pub mod fakes;

use crate::catalog::types::{Book, BookId, BookPatch};
use crate::error::ServiceResult;
use crate::gateway::protocol::InvalidateResponse;
use crate::order::protocol::{PurchaseResponse, ReplicationAck};
use crate::order::types::Order;

use async_trait::async_trait;
use axum::http::HeaderMap;

pub const REPLICATED_HEADER: &str = "x-replicated";
pub const REPLICATED_VALUE: &str = "1";

/// Where an incoming write came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// An original request from a client or another service role.
    Client,
    /// A write forwarded by the peer replica; must not be forwarded again.
    Replica,
}

impl Origin {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let marked = headers
            .get(REPLICATED_HEADER)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.trim() == REPLICATED_VALUE);
        if marked { Origin::Replica } else { Origin::Client }
    }

    pub fn is_replicated(self) -> bool {
        self == Origin::Replica
    }
}

/// Calls served by catalog replicas.
#[async_trait]
pub trait CatalogClient: Send + Sync {
    async fn search(&self, base_url: &str, topic: &str) -> ServiceResult<Vec<Book>>;

    async fn info(&self, base_url: &str, id: BookId) -> ServiceResult<Book>;

    async fn update(
        &self,
        base_url: &str,
        id: BookId,
        patch: &BookPatch,
        origin: Origin,
    ) -> ServiceResult<Book>;
}

/// The gateway's cache invalidation signal.
#[async_trait]
pub trait CacheInvalidator: Send + Sync {
    async fn invalidate(&self, base_url: &str, id: BookId) -> ServiceResult<InvalidateResponse>;
}

/// Calls served by order replicas.
#[async_trait]
pub trait OrderClient: Send + Sync {
    async fn purchase(&self, base_url: &str, id: BookId) -> ServiceResult<PurchaseResponse>;

    /// Pushes a finished order to a peer; always sent with the forwarding marker.
    async fn replicate(&self, base_url: &str, order: &Order) -> ServiceResult<ReplicationAck>;
}
