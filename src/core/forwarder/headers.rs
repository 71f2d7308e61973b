//! Header filtering between client, gateway and upstream

use reqwest::header::{CONTENT_TYPE, HeaderMap};

/// Connection-scoped headers that must not cross a proxy
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Client auth headers; the upstream only ever sees the caller's upstream key
const CLIENT_AUTH: &[&str] = &["authorization", "api-key", "x-api-key"];

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h))
}

/// Whether an inbound header is copied onto the upstream request
pub fn should_forward_request_header(name: &str, credential_header: &str) -> bool {
    !(is_hop_by_hop(name)
        || name.eq_ignore_ascii_case("host")
        || name.eq_ignore_ascii_case("content-length")
        || name.eq_ignore_ascii_case(credential_header)
        || CLIENT_AUTH.iter().any(|h| name.eq_ignore_ascii_case(h)))
}

/// Whether an upstream header is copied onto the client response.
/// Framing is left to the HTTP server.
pub fn should_relay_response_header(name: &str) -> bool {
    !(is_hop_by_hop(name) || name.eq_ignore_ascii_case("content-length"))
}

/// Inbound headers that survive forwarding
pub fn forwardable_request_headers(headers: &HeaderMap, credential_header: &str) -> HeaderMap {
    headers
        .iter()
        .filter(|(name, _)| should_forward_request_header(name.as_str(), credential_header))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Upstream headers that survive relaying
pub fn relayable_response_headers(headers: &HeaderMap) -> HeaderMap {
    headers
        .iter()
        .filter(|(name, _)| should_relay_response_header(name.as_str()))
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}

/// Upstream declared a server-sent event stream
pub fn is_event_stream(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().starts_with("text/event-stream"))
        .unwrap_or(false)
}
