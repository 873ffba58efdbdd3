//! Gateway Module
//!
//! The public entry point. Reads go to a catalog replica chosen round-robin;
//! info-by-id reads go through the read cache first. Purchases go to an order
//! replica chosen round-robin and never touch the cache.
//!
//! The cache is kept honest by the catalog replicas, which call
//! `/cache/invalidate/:id` before every write they apply.

pub mod handlers;
pub mod protocol;
pub mod service;
