//! HTTP server implementation
//!
//! This module provides the HTTP server and routing functionality.

pub mod middleware;
pub mod routes;

pub mod builder;
mod handlers;
pub mod server;
pub mod state;
mod utils;


pub use state::AppState;
