//! Runtime model registration settings

use serde::{Deserialize, Serialize};

/// Registration configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrationConfig {
    /// Expose `POST /v1/models` for registering models while running
    #[serde(default)]
    pub allow_runtime: bool,
}
