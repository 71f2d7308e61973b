//! Server builder and run_server function

use crate::config::Config;
use crate::server::server::HttpServer;
use crate::utils::error::{GatewayError, Result};
use tracing::info;

/// Server builder for easier configuration
pub struct ServerBuilder {
    config: Option<Config>,
}

impl ServerBuilder {
    /// Create a new server builder
    pub fn new() -> Self {
        Self { config: None }
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| GatewayError::Config("Configuration is required".to_string()))?;

        HttpServer::new(&config)
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the server from `config`, log the endpoints and run until stopped
pub async fn run_server(config: Config) -> Result<()> {
    info!("Starting passthrough gateway v{}", crate::VERSION);

    let server = ServerBuilder::new().with_config(config.clone()).build()?;
    info!(
        "Server starting at: http://{}:{}",
        config.server().host,
        config.server().port
    );
    info!(
        "Credential header: {}",
        config.passthrough().credential_header
    );
    info!("API Endpoints:");
    info!("   GET  /health - Health check");
    info!("   GET  /v1/models - Registered models");
    info!("   GET  /v1/models/{{provider_id}}/{{model_id}} - Model detail");
    if config.registration().allow_runtime {
        info!("   POST /v1/models - Register a model");
    }
    info!("   POST /v1/chat/completions - Chat completions");
    info!("   POST /v1/completions - Text completions");
    info!("   POST /v1/embeddings - Text embeddings");

    server.start().await
}
