//! Error types for the gateway

use crate::core::credentials::CredentialError;
use crate::core::forwarder::ForwardError;
use crate::core::registry::{DuplicateError, NotFoundError};
use crate::core::router::RouteError;
use thiserror::Error;

/// Result type alias for the gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid YAML for the expected shape
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Registration conflicts
    #[error(transparent)]
    Duplicate(#[from] DuplicateError),

    /// Unknown provider or model
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// Bad or missing side-channel credentials
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// Model reference could not be routed
    #[error(transparent)]
    Route(RouteError),

    /// Upstream could not be reached
    #[error(transparent)]
    Forward(#[from] ForwardError),

    /// Malformed client request
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Operation disabled by configuration
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Server startup and binding errors
    #[error("Server error: {0}")]
    Server(String),
}
