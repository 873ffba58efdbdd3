//! Replicated Storefront Services
//!
//! A small storefront split into three HTTP service roles, each run as its
//! own process:
//!
//! - **`catalog`**: book records with stock and price. Deployed as two
//!   replicas with independent stores; every write is pushed to the peer.
//! - **`order`**: executes purchases against the catalog and keeps an order
//!   log, also replicated to a peer.
//! - **`gateway`**: the public entry point. Distributes traffic over the
//!   replica sets and caches info-by-id reads, relying on the catalog
//!   replicas to invalidate entries before they write.
//!
//! ## Supporting modules
//! - **`dispatcher`**: round-robin replica selection.
//! - **`cache`**: bounded insertion-order read cache.
//! - **`storage`**: whole-collection record stores (JSON file, memory).
//! - **`transport`**: outbound inter-service calls and the forwarding marker.
//! - **`config`** / **`error`**: process configuration and error taxonomy.
//!
//! Replication is best effort: one attempt, failures logged, no retry, no
//! conflict resolution. Replicas converge only while every propagation call
//! succeeds.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod gateway;
pub mod order;
pub mod storage;
pub mod transport;
