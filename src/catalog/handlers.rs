use super::protocol::{ENDPOINT_BOOKS, ENDPOINT_INFO, ENDPOINT_SEARCH, ENDPOINT_UPDATE, decode_patch};
use super::service::CatalogReplica;
use super::types::{Book, BookId};
use crate::error::ServiceResult;
use crate::transport::Origin;

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Extension, Path};
use axum::http::HeaderMap;
use axum::routing::{get, patch};
use axum::{Json, Router};
use std::sync::Arc;

pub fn router(replica: Arc<CatalogReplica>) -> Router {
    Router::new()
        .route(&format!("{}/:topic", ENDPOINT_SEARCH), get(handle_search))
        .route(&format!("{}/:id", ENDPOINT_INFO), get(handle_info))
        .route(&format!("{}/:id", ENDPOINT_UPDATE), patch(handle_update))
        .route(ENDPOINT_BOOKS, get(handle_list_books))
        .layer(Extension(replica))
}

pub async fn handle_search(
    Extension(replica): Extension<Arc<CatalogReplica>>,
    topic: Result<Path<String>, PathRejection>,
) -> ServiceResult<Json<Vec<Book>>> {
    let Path(topic) = topic?;
    replica.search(&topic).await.map(Json)
}

pub async fn handle_info(
    Extension(replica): Extension<Arc<CatalogReplica>>,
    id: Result<Path<BookId>, PathRejection>,
) -> ServiceResult<Json<Book>> {
    let Path(id) = id?;
    replica.info(id).await.map(Json)
}

pub async fn handle_update(
    Extension(replica): Extension<Arc<CatalogReplica>>,
    id: Result<Path<BookId>, PathRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> ServiceResult<Json<Book>> {
    let Path(id) = id?;
    let patch = decode_patch(&body)?;
    let origin = Origin::from_headers(&headers);
    replica.update(id, patch, origin).await.map(Json)
}

pub async fn handle_list_books(
    Extension(replica): Extension<Arc<CatalogReplica>>,
) -> ServiceResult<Json<Vec<Book>>> {
    replica.list().await.map(Json)
}
