//! Passthrough settings: credential header, URL policy and upstream timeouts

use super::*;
use crate::core::credentials::{CredentialExtractor, DEFAULT_CREDENTIAL_HEADER};
use crate::core::forwarder::ForwarderOptions;
use crate::core::router::RequestRouter;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Passthrough configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PassthroughConfig {
    /// Header carrying `upstream_api_key` / `upstream_url`
    #[serde(default = "default_credential_header")]
    pub credential_header: String,
    /// Reject requests without `upstream_url` instead of using the provider default
    #[serde(default = "default_true")]
    pub require_upstream_url: bool,
    /// Refuse caller-supplied URLs pointing at private or internal hosts
    #[serde(default)]
    pub block_private_upstreams: bool,
    /// Upstream connect timeout in seconds
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    /// Upstream timeout for non-streaming calls in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for PassthroughConfig {
    fn default() -> Self {
        Self {
            credential_header: default_credential_header(),
            require_upstream_url: true,
            block_private_upstreams: false,
            connect_timeout: default_connect_timeout(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl PassthroughConfig {
    pub fn extractor(&self) -> CredentialExtractor {
        if self.require_upstream_url {
            CredentialExtractor::new()
        } else {
            CredentialExtractor::with_url_optional()
        }
    }

    pub fn router(&self) -> RequestRouter {
        RequestRouter::new().with_private_upstreams_blocked(self.block_private_upstreams)
    }

    pub fn forwarder_options(&self) -> ForwarderOptions {
        ForwarderOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout),
            request_timeout: Duration::from_secs(self.request_timeout),
            credential_header: self.credential_header.clone(),
        }
    }
}

fn default_credential_header() -> String {
    DEFAULT_CREDENTIAL_HEADER.to_string()
}
