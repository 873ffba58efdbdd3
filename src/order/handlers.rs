use super::protocol::{
    ENDPOINT_ORDERS, ENDPOINT_PURCHASE, ENDPOINT_REPLICATE_ORDER, PurchaseResponse,
    ReplicationAck, decode_replicated_order,
};
use super::service::OrderReplica;
use super::types::{Order, OrderId};
use crate::catalog::types::BookId;
use crate::error::{ServiceError, ServiceResult};
use crate::transport::Origin;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Extension, Path};
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

pub fn router(replica: Arc<OrderReplica>) -> Router {
    Router::new()
        .route(&format!("{}/:id", ENDPOINT_PURCHASE), post(handle_purchase))
        .route(ENDPOINT_REPLICATE_ORDER, post(handle_replicate_order))
        .route(ENDPOINT_ORDERS, get(handle_list_orders))
        .route(&format!("{}/:id", ENDPOINT_ORDERS), get(handle_get_order))
        .layer(Extension(replica))
}

pub async fn handle_purchase(
    Extension(replica): Extension<Arc<OrderReplica>>,
    id: Result<Path<BookId>, PathRejection>,
    headers: HeaderMap,
) -> ServiceResult<Json<PurchaseResponse>> {
    let Path(id) = id?;
    let origin = Origin::from_headers(&headers);
    replica.purchase(id, origin).await.map(Json)
}

pub async fn handle_replicate_order(
    Extension(replica): Extension<Arc<OrderReplica>>,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> ServiceResult<Json<ReplicationAck>> {
    let Json(payload) = payload.map_err(|rejection| {
        tracing::warn!("Malformed replicated order: {}", rejection.body_text());
        ServiceError::InvalidRequest("Invalid replicated order".to_string())
    })?;
    let order = decode_replicated_order(payload)?;
    replica.accept_replicated(order).await.map(Json)
}

pub async fn handle_list_orders(
    Extension(replica): Extension<Arc<OrderReplica>>,
) -> Json<Vec<Order>> {
    Json(replica.list().await)
}

pub async fn handle_get_order(
    Extension(replica): Extension<Arc<OrderReplica>>,
    id: Result<Path<OrderId>, PathRejection>,
) -> ServiceResult<Json<Order>> {
    let Path(id) = id?;
    replica.get(id).await.map(Json)
}
