//! Core passthrough functionality
//!
//! The registry knows which models exist, credentials come from each request,
//! the router combines the two and the forwarder makes the upstream call.

pub mod credentials;
pub mod forwarder;
pub mod registry;
pub mod router;
