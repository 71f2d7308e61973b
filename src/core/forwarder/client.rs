//! Shared HTTP client for upstream calls

use super::error::ForwardError;
use reqwest::Client;
use std::time::Duration;

/// Connection pool settings for upstream providers
pub struct PoolConfig;

impl PoolConfig {
    pub const POOL_SIZE: usize = 80;
    pub const KEEPALIVE_SECS: u64 = 90;
}

/// Build the upstream client.
///
/// There is no client-wide timeout: streaming responses may legitimately run
/// for minutes, so the forwarder applies a per-request timeout only to
/// non-streaming calls. Redirects are relayed to the caller, not followed.
pub fn build_http_client(connect_timeout: Duration) -> Result<Client, ForwardError> {
    Client::builder()
        .connect_timeout(connect_timeout)
        .pool_idle_timeout(Duration::from_secs(PoolConfig::KEEPALIVE_SECS))
        .pool_max_idle_per_host(PoolConfig::POOL_SIZE)
        .redirect(reqwest::redirect::Policy::none())
        .tcp_nodelay(true)
        .build()
        .map_err(|e| ForwardError::unreachable(format!("failed to create HTTP client: {}", e)))
}
