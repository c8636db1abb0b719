//! HTTP front for the Cool Bordados product search.
//!
//! Exposed as a library so integration tests can build the router in-process.

pub mod api;
pub mod metrics;
pub mod state;
