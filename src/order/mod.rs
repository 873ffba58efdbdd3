//! Order Replica Module
//!
//! Executes purchases against the catalog and keeps a local order log that is
//! pushed, best effort, to a peer order replica.
//!
//! ## Purchase flow
//! 1. Pick a catalog replica with the dispatcher.
//! 2. Read the book from it; 404 ends the purchase.
//! 3. Reject if `quantity <= 0`.
//! 4. Write `quantity - 1` back to the *same* catalog replica.
//! 5. Append the new order locally and persist.
//! 6. Push the order to the peer (forwarding marker set), unless this
//!    purchase was itself forwarded. Failures are logged, never retried.
//!
//! ## Replicated orders
//! The peer receiver is idempotent on order id and fast-forwards the local id
//! sequence past every accepted id.

pub mod handlers;
pub mod protocol;
pub mod service;
pub mod types;
