//! Gateway HTTP Protocol
//!
//! The gateway re-exposes the catalog read routes (`/search/:topic`,
//! `/info/:id`) and the order write route (`/purchase/:id`) under the same
//! paths, plus the cache invalidation endpoint consumed by catalog replicas.

use crate::catalog::types::BookId;

use serde::{Deserialize, Serialize};

/// Cache invalidation signal sent by catalog replicas before a write.
pub const ENDPOINT_CACHE_INVALIDATE: &str = "/cache/invalidate";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvalidateResponse {
    pub message: String,
    pub id: BookId,
    pub existed: bool,
}

impl InvalidateResponse {
    pub fn new(id: BookId, existed: bool) -> Self {
        Self {
            message: "Cache invalidated".to_string(),
            id,
            existed,
        }
    }
}

/// Body of `GET /`: what this gateway fronts and how it is configured.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescription {
    pub message: String,
    pub endpoints: EndpointList,
    pub cache_enabled: bool,
    pub cache_max: usize,
    pub catalog_replicas: Vec<String>,
    pub order_replicas: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointList {
    pub search: String,
    pub info: String,
    pub purchase: String,
}

impl Default for EndpointList {
    fn default() -> Self {
        Self {
            search: "GET /search/:topic".to_string(),
            info: "GET /info/:id".to_string(),
            purchase: "POST /purchase/:id".to_string(),
        }
    }
}
