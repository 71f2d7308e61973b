//! Validators for the gateway configuration sections

use super::trait_def::Validate;
use crate::config::models::*;
use crate::core::registry::ProviderRecord;
use reqwest::header::HeaderName;
use std::collections::HashSet;
use tracing::debug;

impl Validate for GatewayConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating gateway configuration");

        self.server.validate()?;
        self.passthrough.validate()?;

        let mut provider_ids = HashSet::new();
        for provider in &self.providers {
            provider.validate()?;
            if !provider_ids.insert(provider.provider_id.as_str()) {
                return Err(format!("Duplicate provider id: {}", provider.provider_id));
            }
        }

        let mut model_keys = HashSet::new();
        for model in &self.models {
            if model.model_id.trim().is_empty() {
                return Err(format!(
                    "Model under provider '{}' has an empty model_id",
                    model.provider_id
                ));
            }
            if !provider_ids.contains(model.provider_id.as_str()) {
                return Err(format!(
                    "Model '{}' references unknown provider '{}'",
                    model.identifier(),
                    model.provider_id
                ));
            }
            if !model_keys.insert((model.provider_id.as_str(), model.model_id.as_str())) {
                return Err(format!("Duplicate model: {}", model.identifier()));
            }
        }

        debug!("Gateway configuration validation completed");
        Ok(())
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err("Worker count must be greater than 0".to_string());
            }
            if workers > 1000 {
                return Err("Worker count seems too high (>1000)".to_string());
            }
        }

        if self.max_body_size == 0 {
            return Err("Max body size must be greater than 0".to_string());
        }

        self.cors.validate()
    }
}

impl Validate for CorsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.enabled && self.allows_all_origins() && self.allow_credentials {
            return Err(
                "CORS cannot allow all origins (*) when credentials are enabled".to_string(),
            );
        }
        Ok(())
    }
}

impl Validate for PassthroughConfig {
    fn validate(&self) -> Result<(), String> {
        HeaderName::from_bytes(self.credential_header.as_bytes()).map_err(|_| {
            format!(
                "Invalid credential header name: '{}'",
                self.credential_header
            )
        })?;

        if self.connect_timeout == 0 {
            return Err("Connect timeout must be greater than 0".to_string());
        }

        if self.request_timeout == 0 {
            return Err("Request timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for ProviderRecord {
    fn validate(&self) -> Result<(), String> {
        if self.provider_id.trim().is_empty() {
            return Err("Provider id cannot be empty".to_string());
        }

        if self.provider_id.contains('/') {
            return Err(format!(
                "Provider id '{}' cannot contain '/'",
                self.provider_id
            ));
        }

        if let Some(url) = &self.default_base_url {
            if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
                return Err(format!(
                    "Provider '{}' default_base_url must be an http(s) URL with a host",
                    self.provider_id
                ));
            }
        }

        Ok(())
    }
}
