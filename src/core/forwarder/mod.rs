//! Passthrough forwarder
//!
//! Sends the caller's request to the resolved upstream with the caller's key
//! attached and hands the upstream response back as-is. The body is never
//! parsed, upstream error statuses are relayed rather than translated, and
//! nothing is retried.

mod client;
mod error;
pub mod headers;
mod relay;
mod types;

pub use client::{PoolConfig, build_http_client};
pub use error::ForwardError;
pub use relay::RelayStream;
pub use types::{ForwardedBody, ForwardedResponse, InboundRequest};

use crate::core::router::EffectiveRoute;
use crate::utils::logging::redaction::{redact_headers, redact_url};
use futures::TryStreamExt;
use headers::{forwardable_request_headers, is_event_stream, relayable_response_headers};
use reqwest::Client;
use reqwest::header::HeaderValue;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

/// Forwarder settings
#[derive(Debug, Clone)]
pub struct ForwarderOptions {
    pub connect_timeout: Duration,
    /// Applied to non-streaming calls only
    pub request_timeout: Duration,
    /// Side-channel header, stripped before forwarding
    pub credential_header: String,
}

impl Default for ForwarderOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(600),
            credential_header: crate::core::credentials::DEFAULT_CREDENTIAL_HEADER.to_string(),
        }
    }
}

/// Issues upstream calls for resolved routes
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: Client,
    options: ForwarderOptions,
}

impl Forwarder {
    pub fn new(options: ForwarderOptions) -> Result<Self, ForwardError> {
        let client = build_http_client(options.connect_timeout)?;
        Ok(Self { client, options })
    }

    pub fn with_client(client: Client, options: ForwarderOptions) -> Self {
        Self { client, options }
    }

    pub fn options(&self) -> &ForwarderOptions {
        &self.options
    }

    /// Upstream URL for an inbound path: the route's base URL, the provider
    /// kind's path suffix, then the base and inbound query strings.
    pub fn upstream_url(
        route: &EffectiveRoute,
        path: &str,
        query: Option<&str>,
    ) -> Result<Url, ForwardError> {
        let mut url = route.resolved_url.clone();
        if url.cannot_be_a_base() {
            return Err(ForwardError::InvalidUpstreamUrl(
                "URL cannot be used as a base".to_string(),
            ));
        }

        let base_path = url.path().trim_end_matches('/').to_string();
        let suffix = route.resolved_provider.kind.path_suffix(&base_path, path);
        url.set_path(&format!("{}{}", base_path, suffix));

        let merged_query = match (url.query(), query.filter(|q| !q.is_empty())) {
            (Some(base), Some(inbound)) => Some(format!("{}&{}", base, inbound)),
            (None, Some(inbound)) => Some(inbound.to_string()),
            (base, None) => base.map(str::to_string),
        };
        url.set_query(merged_query.as_deref());
        url.set_fragment(None);

        Ok(url)
    }

    /// Forward one request and return the upstream response.
    ///
    /// Streams when the client asked for `stream: true` or the upstream
    /// answers with `text/event-stream`; otherwise the body is buffered.
    pub async fn forward(
        &self,
        route: EffectiveRoute,
        inbound: InboundRequest,
    ) -> Result<ForwardedResponse, ForwardError> {
        let started = Instant::now();
        let provider_id = route.resolved_provider.provider_id.clone();
        let kind = route.resolved_provider.kind;
        let url = Self::upstream_url(&route, &inbound.path, inbound.query.as_deref())?;

        let mut headers =
            forwardable_request_headers(&inbound.headers, &self.options.credential_header);
        let mut auth = HeaderValue::from_str(
            &kind.auth_header_value(&route.credentials.upstream_api_key),
        )
        .map_err(|_| ForwardError::InvalidApiKey)?;
        auth.set_sensitive(true);
        headers.insert(kind.auth_header_name(), auth);

        debug!(
            provider_id = %provider_id,
            method = %inbound.method,
            upstream = %redact_url(&url),
            body_bytes = inbound.body.len(),
            stream_requested = inbound.stream_requested,
            headers = ?redact_headers(&headers, &[kind.auth_header_name()]),
            "Forwarding request upstream"
        );

        let request = self
            .client
            .request(inbound.method, url)
            .headers(headers)
            .body(inbound.body);

        // Bounds the response head and a buffered body, never a relayed stream
        let deadline = (!inbound.stream_requested)
            .then(|| tokio::time::Instant::now() + self.options.request_timeout);

        let response = self
            .within(deadline, request.send())
            .await
            .inspect_err(|error| {
                warn!(provider_id = %provider_id, error = %error, "Upstream request failed");
            })?;

        let status = response.status();
        let headers = relayable_response_headers(response.headers());
        let streaming = inbound.stream_requested || is_event_stream(response.headers());

        if status.is_success() {
            debug!(
                provider_id = %provider_id,
                status = status.as_u16(),
                streaming,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Upstream responded"
            );
        } else {
            info!(
                provider_id = %provider_id,
                status = status.as_u16(),
                "Upstream returned an error status, relaying it"
            );
        }

        let body = if streaming {
            let chunks = response.bytes_stream().map_err(reqwest::Error::without_url);
            ForwardedBody::Stream(Box::pin(RelayStream::new(chunks, provider_id)))
        } else {
            ForwardedBody::Buffered(self.within(deadline, response.bytes()).await?)
        };

        Ok(ForwardedResponse {
            status,
            headers,
            body,
        })
    }

    /// Await an upstream call, giving up at `deadline` when there is one
    async fn within<T, F>(
        &self,
        deadline: Option<tokio::time::Instant>,
        call: F,
    ) -> Result<T, ForwardError>
    where
        F: Future<Output = Result<T, reqwest::Error>>,
    {
        let result = match deadline {
            Some(deadline) => tokio::time::timeout_at(deadline, call).await.map_err(|_| {
                ForwardError::timed_out(format!(
                    "no complete response within {}s",
                    self.options.request_timeout.as_secs()
                ))
            })?,
            None => call.await,
        };
        result.map_err(ForwardError::from_reqwest)
    }
}
