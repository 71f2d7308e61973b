//! Configuration data models

pub mod gateway;
pub mod passthrough;
pub mod registration;
pub mod server;

pub use gateway::*;
pub use passthrough::*;
pub use registration::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    10 * 1024 * 1024 // 10MB
}

/// Default upstream connect timeout in seconds
pub fn default_connect_timeout() -> u64 {
    10
}

/// Default upstream timeout for non-streaming calls in seconds
pub fn default_request_timeout() -> u64 {
    600
}

pub fn default_true() -> bool {
    true
}
