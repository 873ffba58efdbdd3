//! Order HTTP Protocol
//!
//! Route paths and wire payloads of an order replica.

use super::types::{Order, OrderId};
use crate::error::{ServiceError, ServiceResult};

use serde::{Deserialize, Serialize};

/// Executes a purchase of one copy of a book.
pub const ENDPOINT_PURCHASE: &str = "/purchase";
/// Receives a finished order pushed by the peer replica.
pub const ENDPOINT_REPLICATE_ORDER: &str = "/replicate/order";
/// Lists local orders, or fetches one by id (`/orders/:id`).
pub const ENDPOINT_ORDERS: &str = "/orders";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub message: String,
    pub order: Order,
    pub remaining_quantity: i64,
}

impl PurchaseResponse {
    pub fn new(order: Order, remaining_quantity: i64) -> Self {
        Self {
            message: "Purchase successful!".to_string(),
            order,
            remaining_quantity,
        }
    }
}

/// Acknowledgement of a replicated order. `existed` is `true` when the
/// order was already present and the push was ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplicationAck {
    pub message: String,
    pub id: OrderId,
    pub existed: bool,
}

impl ReplicationAck {
    pub fn new(id: OrderId, existed: bool) -> Self {
        Self {
            message: "Replicated order processed".to_string(),
            id,
            existed,
        }
    }
}

/// Validates a replicated order payload.
///
/// A payload without an `id` is rejected outright; anything else that does
/// not have the shape of an `Order` is rejected as well.
pub fn decode_replicated_order(payload: serde_json::Value) -> ServiceResult<Order> {
    let has_id = payload.get("id").is_some_and(|id| !id.is_null());
    if !has_id {
        return Err(ServiceError::InvalidRequest(
            "Invalid replicated order".to_string(),
        ));
    }

    serde_json::from_value(payload).map_err(|e| {
        tracing::warn!("Malformed replicated order: {}", e);
        ServiceError::InvalidRequest("Invalid replicated order".to_string())
    })
}
