//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::credentials::CredentialExtractor;
use crate::core::forwarder::Forwarder;
use crate::core::registry::ModelRegistry;
use crate::core::router::RequestRouter;
use crate::utils::error::Result;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// Cloned into every actix worker. The registry is the only shared mutable
/// part and handles its own synchronization.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Registered providers and models
    pub registry: Arc<ModelRegistry>,
    /// Side-channel credential parser
    pub extractor: CredentialExtractor,
    /// Model reference resolution
    pub router: RequestRouter,
    /// Upstream HTTP client
    pub forwarder: Forwarder,
}

impl AppState {
    /// Create state from configuration and an already-populated registry
    pub fn new(config: Config, registry: Arc<ModelRegistry>) -> Result<Self> {
        let passthrough = config.passthrough();
        let extractor = passthrough.extractor();
        let router = passthrough.router();
        let forwarder = Forwarder::new(passthrough.forwarder_options())?;

        Ok(Self {
            config: Arc::new(config),
            registry,
            extractor,
            router,
            forwarder,
        })
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
