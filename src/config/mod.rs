//! Configuration management for the gateway
//!
//! Loads the YAML file, applies environment overrides and validates the
//! result before anything else starts.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{GatewayError, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Main configuration struct for the gateway
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Gateway configuration
    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path).await?;

        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let gateway: GatewayConfig = serde_yaml::from_str(content)?;

        let config = Self { gateway };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file does not exist
    pub async fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            Self::from_file(path).await
        } else {
            warn!(
                "Config file {:?} not found, starting with defaults and an empty registry",
                path
            );
            Ok(Self::default())
        }
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.gateway.server
    }

    /// Get passthrough settings
    pub fn passthrough(&self) -> &PassthroughConfig {
        &self.gateway.passthrough
    }

    /// Get registration settings
    pub fn registration(&self) -> &RegistrationConfig {
        &self.gateway.registration
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");
        self.gateway.validate().map_err(GatewayError::Config)?;

        if self.gateway.server.cors.enabled && self.gateway.server.cors.allows_all_origins() {
            warn!("CORS allows all origins. This may be insecure for production.");
        }

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.gateway)?)
    }
}
