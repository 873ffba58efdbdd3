use super::protocol::{ENDPOINT_CACHE_INVALIDATE, InvalidateResponse, ServiceDescription};
use super::service::Gateway;
use crate::catalog::protocol::{ENDPOINT_INFO, ENDPOINT_SEARCH};
use crate::catalog::types::{Book, BookId};
use crate::error::ServiceResult;
use crate::order::protocol::{ENDPOINT_PURCHASE, PurchaseResponse};

use axum::extract::rejection::PathRejection;
use axum::extract::{Extension, Path};
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

pub fn router(gateway: Arc<Gateway>) -> Router {
    Router::new()
        .route("/", get(handle_describe))
        .route(&format!("{}/:topic", ENDPOINT_SEARCH), get(handle_search))
        .route(&format!("{}/:id", ENDPOINT_INFO), get(handle_info))
        .route(&format!("{}/:id", ENDPOINT_PURCHASE), post(handle_purchase))
        .route(
            &format!("{}/:id", ENDPOINT_CACHE_INVALIDATE),
            post(handle_invalidate),
        )
        .layer(Extension(gateway))
}

pub async fn handle_describe(Extension(gateway): Extension<Arc<Gateway>>) -> Json<ServiceDescription> {
    Json(gateway.describe())
}

pub async fn handle_search(
    Extension(gateway): Extension<Arc<Gateway>>,
    topic: Result<Path<String>, PathRejection>,
) -> ServiceResult<Json<Vec<Book>>> {
    let Path(topic) = topic?;
    gateway.search(&topic).await.map(Json)
}

pub async fn handle_info(
    Extension(gateway): Extension<Arc<Gateway>>,
    id: Result<Path<BookId>, PathRejection>,
) -> ServiceResult<Json<Book>> {
    let Path(id) = id?;
    gateway.info(id).await.map(Json)
}

pub async fn handle_purchase(
    Extension(gateway): Extension<Arc<Gateway>>,
    id: Result<Path<BookId>, PathRejection>,
) -> ServiceResult<Json<PurchaseResponse>> {
    let Path(id) = id?;
    gateway.purchase(id).await.map(Json)
}

pub async fn handle_invalidate(
    Extension(gateway): Extension<Arc<Gateway>>,
    id: Result<Path<BookId>, PathRejection>,
) -> ServiceResult<Json<InvalidateResponse>> {
    let Path(id) = id?;
    Ok(Json(gateway.invalidate(id)))
}
