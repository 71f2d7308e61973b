//! Main gateway configuration

use super::*;
use crate::core::registry::{ModelEntry, ProviderRecord};
use serde::{Deserialize, Serialize};

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Credential and forwarding behaviour
    #[serde(default)]
    pub passthrough: PassthroughConfig,
    /// Runtime registration settings
    #[serde(default)]
    pub registration: RegistrationConfig,
    /// Providers loaded into the registry at startup
    #[serde(default)]
    pub providers: Vec<ProviderRecord>,
    /// Models loaded into the registry at startup
    #[serde(default)]
    pub models: Vec<ModelEntry>,
}
