//! Catalog HTTP Protocol
//!
//! Route paths served by a catalog replica. Every route answers with plain
//! `Book` JSON (or an array of them); failures use the shared
//! `{"error": "..."}` body.
//!
//! Updates arriving from the peer replica carry the forwarding marker
//! header (see `transport::REPLICATED_HEADER`).

use super::types::BookPatch;
use crate::error::{ServiceError, ServiceResult};

/// All books whose topic contains the path segment (case-insensitive).
pub const ENDPOINT_SEARCH: &str = "/search";
/// Single book by id.
pub const ENDPOINT_INFO: &str = "/info";
/// Partial update (`quantity`, `price`) of a single book.
pub const ENDPOINT_UPDATE: &str = "/update";
/// The whole local collection.
pub const ENDPOINT_BOOKS: &str = "/books";


/// Decodes an update body. An empty body is an update with no fields.
pub fn decode_patch(body: &[u8]) -> ServiceResult<BookPatch> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(BookPatch::default());
    }
    serde_json::from_slice(body)
        .map_err(|e| ServiceError::InvalidRequest(format!("Invalid update body: {}", e)))
}
