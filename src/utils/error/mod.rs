//! Error handling for the gateway
//!
//! Component errors (registry, credentials, routing, forwarding) stay typed
//! in their own modules and are unified here into [`GatewayError`], which
//! knows how to render itself as an HTTP response.

mod conversions;
mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{GatewayError, Result};
