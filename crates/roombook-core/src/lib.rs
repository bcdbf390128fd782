//! Shared service plumbing for Roombook.
//!
//! Tracing setup, the request-id layer, and serde helpers. Domain logic
//! never lives here; the health probes live in the service because readiness
//! depends on its database handle.

pub mod middleware;
pub mod serde;
pub mod tracing;
