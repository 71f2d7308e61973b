//! Passthrough inference endpoints
//!
//! The body is read only far enough to learn `model` and `stream`; the bytes
//! that go upstream are exactly the bytes that came in.

use crate::core::credentials::CredentialError;
use crate::core::forwarder::{ForwardedBody, ForwardedResponse, InboundRequest};
use crate::server::state::AppState;
use crate::utils::error::GatewayError;
use actix_web::http::StatusCode;
use actix_web::http::header::{CACHE_CONTROL, HeaderName, HeaderValue};
use actix_web::{HttpRequest, HttpResponse, web};
use bytes::Bytes;
use serde::Deserialize;
use tracing::{debug, info};

/// The two body fields the gateway needs
#[derive(Debug, Deserialize)]
struct RequestTarget {
    model: String,
    #[serde(default)]
    stream: Option<bool>,
}

impl RequestTarget {
    fn peek(body: &[u8]) -> Result<Self, GatewayError> {
        serde_json::from_slice(body).map_err(|_| {
            GatewayError::bad_request(
                "request body must be a JSON object with a string 'model' field",
            )
        })
    }
}

/// Chat completions endpoint
pub async fn chat_completions(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: Bytes,
) -> Result<HttpResponse, GatewayError> {
    passthrough(&state, &req, body).await
}

/// Text completions endpoint
pub async fn completions(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: Bytes,
) -> Result<HttpResponse, GatewayError> {
    passthrough(&state, &req, body).await
}

/// Embeddings endpoint
pub async fn embeddings(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: Bytes,
) -> Result<HttpResponse, GatewayError> {
    passthrough(&state, &req, body).await
}

/// Extract credentials, route, forward, relay
async fn passthrough(
    state: &AppState,
    req: &HttpRequest,
    body: Bytes,
) -> Result<HttpResponse, GatewayError> {
    let target = RequestTarget::peek(&body)?;
    let stream_requested = target.stream.unwrap_or(false);
    info!(
        model = %target.model,
        stream = stream_requested,
        path = req.path(),
        "Passthrough request"
    );

    let header_name = &state.config.passthrough().credential_header;
    let raw = req
        .headers()
        .get(header_name.as_str())
        .ok_or_else(|| CredentialError::MissingHeader {
            header: header_name.clone(),
        })?
        .to_str()
        .map_err(|_| CredentialError::Malformed("header is not valid ASCII".to_string()))?;
    let credentials = state.extractor.extract(raw)?;

    let route = state
        .router
        .route(&target.model, credentials, &state.registry)?;

    let inbound = inbound_request(req, body, stream_requested);
    let response = state.forwarder.forward(route, inbound).await?;

    Ok(into_http_response(response))
}

/// Re-express the actix request in the forwarder's types
fn inbound_request(req: &HttpRequest, body: Bytes, stream_requested: bool) -> InboundRequest {
    let method = reqwest::Method::from_bytes(req.method().as_str().as_bytes())
        .unwrap_or(reqwest::Method::POST);

    let mut inbound = InboundRequest::new(method, req.path())
        .with_body(body)
        .with_stream_requested(stream_requested);

    if !req.query_string().is_empty() {
        inbound = inbound.with_query(req.query_string());
    }

    for (name, value) in req.headers() {
        if let (Ok(name), Ok(value)) = (
            reqwest::header::HeaderName::from_bytes(name.as_str().as_bytes()),
            reqwest::header::HeaderValue::from_bytes(value.as_bytes()),
        ) {
            inbound = inbound.with_header(name, value);
        }
    }

    inbound
}

/// Relay the upstream status, headers and body to the client
fn into_http_response(response: ForwardedResponse) -> HttpResponse {
    let status = StatusCode::from_u16(response.status.as_u16()).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = HttpResponse::build(status);

    for (name, value) in response.headers.iter() {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_str().as_bytes()),
            HeaderValue::from_bytes(value.as_bytes()),
        ) {
            builder.append_header((name, value));
        }
    }

    match response.body {
        ForwardedBody::Buffered(bytes) => {
            debug!(status = status.as_u16(), bytes = bytes.len(), "Relaying buffered response");
            builder.body(bytes)
        }
        ForwardedBody::Stream(stream) => {
            debug!(status = status.as_u16(), "Relaying streamed response");
            if !response.headers.contains_key(reqwest::header::CACHE_CONTROL) {
                builder.insert_header((CACHE_CONTROL, "no-cache"));
            }
            // Keeps nginx-style proxies in front of the gateway from buffering
            builder.insert_header(("x-accel-buffering", "no"));
            builder.streaming(stream)
        }
    }
}
