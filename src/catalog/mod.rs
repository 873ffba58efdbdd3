//! Catalog Replica Module
//!
//! Owns the book records of one catalog replica.
//!
//! ## Write protocol
//! 1. **Pre-invalidate**: tell the gateway to drop its cached copy of the book.
//!    Failure (or no gateway configured) is logged and ignored.
//! 2. **Apply**: overwrite the fields present in the request and persist the
//!    whole store. An unknown id ends the request with not-found before
//!    anything is written or forwarded.
//! 3. **Replicate**: forward the same patch to the peer replica with the
//!    forwarding marker set, unless the request already carried it.
//!
//! Reads are served straight from the local store.

pub mod handlers;
pub mod protocol;
pub mod service;
pub mod types;
