//! # passthrough-gateway
//!
//! A stateless, OpenAI-compatible gateway. Clients address models as
//! `provider_id/model_id` and send their own upstream key and URL in a
//! side-channel header; the gateway resolves the model, forwards the request
//! verbatim and relays the response, streaming or not.
//!
//! ```text
//! POST /v1/chat/completions
//! X-Provider-Data: {"upstream_api_key": "sk-...", "upstream_url": "https://api.openai.com"}
//!
//! {"model": "openai/gpt-4o", "messages": [...], "stream": true}
//! ```
//!
//! ## Embedding
//!
//! ```rust,no_run
//! use passthrough_gateway::{Config, Gateway};
//!
//! #[actix_web::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!     Gateway::new(config)?.run().await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod utils;

pub use config::Config;
pub use core::credentials::{CredentialError, CredentialExtractor, RequestCredentials, UpstreamApiKey};
pub use core::forwarder::{ForwardError, ForwardedBody, ForwardedResponse, Forwarder, InboundRequest};
pub use core::registry::{ModelEntry, ModelRegistry, ModelType, ProviderKind, ProviderRecord};
pub use core::router::{EffectiveRoute, RequestRouter, RouteError};
pub use utils::error::{GatewayError, Result};

use tracing::info;

/// A configured gateway ready to serve
pub struct Gateway {
    config: Config,
    server: server::server::HttpServer,
}

impl Gateway {
    /// Load the registry and prepare the HTTP server
    pub fn new(config: Config) -> Result<Self> {
        info!("Creating new gateway instance");
        let server = server::server::HttpServer::new(&config)?;
        Ok(Self { config, server })
    }

    /// Registry shared with the running server
    pub fn registry(&self) -> &std::sync::Arc<ModelRegistry> {
        &self.server.state().registry
    }

    /// Run the gateway server until it stops
    pub async fn run(self) -> Result<()> {
        info!(
            "Starting passthrough gateway on {}",
            self.config.server().address()
        );
        self.server.start().await
    }
}

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Build time as seconds since the epoch
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: env!("BUILD_TIME"),
            git_hash: env!("GIT_HASH"),
            rust_version: env!("RUST_VERSION"),
        }
    }
}

/// Build information captured by the build script
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
