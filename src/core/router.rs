//! Request routing
//!
//! Turns a logical `provider_id/model_id` plus the caller's credentials into
//! an [`EffectiveRoute`]. Pure resolution: no network access, no waiting on
//! the registry beyond a snapshot load.

use crate::config::validation::ssrf::check_upstream_host;
use crate::core::credentials::RequestCredentials;
use crate::core::registry::{ModelRegistry, NotFoundError, ProviderRecord};
use thiserror::Error;
use tracing::debug;
use url::Url;

/// A parsed `provider_id/model_id` reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelRef<'a> {
    pub provider_id: &'a str,
    pub model_id: &'a str,
}

impl<'a> ModelRef<'a> {
    /// Split on the first `/`; the model id may itself contain slashes
    pub fn parse(model_ref: &'a str) -> Result<Self, RouteError> {
        match model_ref.split_once('/') {
            Some((provider_id, model_id)) if !provider_id.is_empty() && !model_id.is_empty() => {
                Ok(Self {
                    provider_id,
                    model_id,
                })
            }
            _ => Err(RouteError::InvalidModelRef(model_ref.to_string())),
        }
    }
}

/// Where one request goes and with which credentials
#[derive(Debug, Clone)]
pub struct EffectiveRoute {
    pub resolved_provider: ProviderRecord,
    pub resolved_url: Url,
    pub credentials: RequestCredentials,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid model reference '{0}', expected 'provider_id/model_id'")]
    InvalidModelRef(String),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("no upstream URL for provider '{provider_id}': none in the request and no default configured")]
    NoUpstream { provider_id: String },

    #[error("upstream URL rejected: {0}")]
    BlockedUpstream(String),
}

/// Resolves model references against a registry
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestRouter {
    block_private_upstreams: bool,
}

impl RequestRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse caller-supplied URLs that point at private or internal hosts
    pub fn with_private_upstreams_blocked(mut self, blocked: bool) -> Self {
        self.block_private_upstreams = blocked;
        self
    }

    pub fn route(
        &self,
        model_ref: &str,
        credentials: RequestCredentials,
        registry: &ModelRegistry,
    ) -> Result<EffectiveRoute, RouteError> {
        let ModelRef {
            provider_id,
            model_id,
        } = ModelRef::parse(model_ref)?;

        let provider = registry.resolve(provider_id, model_id)?;

        // A per-request URL always beats the static default
        let resolved_url = match (&credentials.upstream_url, &provider.default_base_url) {
            (Some(url), _) => {
                if self.block_private_upstreams {
                    check_upstream_host(url).map_err(RouteError::BlockedUpstream)?;
                }
                url.clone()
            }
            (None, Some(default)) => default.clone(),
            (None, None) => {
                return Err(RouteError::NoUpstream {
                    provider_id: provider.provider_id,
                });
            }
        };

        debug!(
            provider_id = %provider.provider_id,
            model_id,
            upstream_host = resolved_url.host_str().unwrap_or_default(),
            from_request = credentials.upstream_url.is_some(),
            "Resolved route"
        );

        Ok(EffectiveRoute {
            resolved_provider: provider,
            resolved_url,
            credentials,
        })
    }
}

/// Resolve with the default router
pub fn route(
    model_ref: &str,
    credentials: RequestCredentials,
    registry: &ModelRegistry,
) -> Result<EffectiveRoute, RouteError> {
    RequestRouter::new().route(model_ref, credentials, registry)
}
