//! Per-request upstream credentials
//!
//! Callers send the upstream URL and key in a side-channel header holding a
//! JSON object:
//!
//! ```text
//! X-Provider-Data: {"upstream_api_key": "sk-...", "upstream_url": "https://api.openai.com"}
//! ```
//!
//! Credentials live only for the request that carried them. They are never
//! stored, and the key type refuses to print its value.

use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use url::Url;

/// Default side-channel header name
pub const DEFAULT_CREDENTIAL_HEADER: &str = "X-Provider-Data";

const API_KEY_FIELD: &str = "upstream_api_key";
const URL_FIELD: &str = "upstream_url";
const API_KEY_FIELDS: &[&str] = &[API_KEY_FIELD, "passthrough_api_key"];
const URL_FIELDS: &[&str] = &[URL_FIELD, "passthrough_url"];

/// Caller-supplied upstream API key
#[derive(Clone, PartialEq, Eq)]
pub struct UpstreamApiKey(String);

impl UpstreamApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw key. Only the forwarder's auth header should need this.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for UpstreamApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UpstreamApiKey([REDACTED])")
    }
}

impl fmt::Display for UpstreamApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Credentials extracted from one inbound request
#[derive(Debug, Clone)]
pub struct RequestCredentials {
    /// Upstream base URL; `None` only when the extractor allows falling back
    /// to the provider's default
    pub upstream_url: Option<Url>,
    pub upstream_api_key: UpstreamApiKey,
}

impl RequestCredentials {
    pub fn new(upstream_url: Option<Url>, upstream_api_key: UpstreamApiKey) -> Self {
        Self {
            upstream_url,
            upstream_api_key,
        }
    }
}

/// Why the side-channel header was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("missing '{header}' header carrying upstream_api_key and upstream_url")]
    MissingHeader { header: String },

    #[error("malformed provider data: {0}")]
    Malformed(String),

    #[error("incomplete credentials: missing {}", .missing.join(", "))]
    IncompleteCredentials { missing: Vec<&'static str> },

    #[error("invalid upstream_url: {0}")]
    InvalidUrl(String),
}

/// Parses the side-channel header into [`RequestCredentials`]
#[derive(Debug, Clone, Copy)]
pub struct CredentialExtractor {
    require_upstream_url: bool,
}

impl CredentialExtractor {
    /// Both fields mandatory
    pub fn new() -> Self {
        Self {
            require_upstream_url: true,
        }
    }

    /// Key mandatory; a missing URL falls back to the provider default
    pub fn with_url_optional() -> Self {
        Self {
            require_upstream_url: false,
        }
    }

    pub fn requires_upstream_url(&self) -> bool {
        self.require_upstream_url
    }

    /// Parse a raw header value
    pub fn extract(&self, raw_header: &str) -> Result<RequestCredentials, CredentialError> {
        // Serde's typed errors echo offending values, which may be the key
        let value: Value = serde_json::from_str(raw_header.trim()).map_err(|e| {
            CredentialError::Malformed(format!(
                "expected a JSON object (line {}, column {})",
                e.line(),
                e.column()
            ))
        })?;

        let Value::Object(fields) = value else {
            return Err(CredentialError::Malformed(
                "expected a JSON object".to_string(),
            ));
        };

        let api_key = string_field(&fields, API_KEY_FIELDS)?;
        let url = string_field(&fields, URL_FIELDS)?;

        let mut missing = Vec::new();
        if api_key.is_none() {
            missing.push(API_KEY_FIELD);
        }
        if url.is_none() && self.require_upstream_url {
            missing.push(URL_FIELD);
        }
        if !missing.is_empty() {
            return Err(CredentialError::IncompleteCredentials { missing });
        }

        let upstream_url = url.map(|raw| parse_upstream_url(&raw)).transpose()?;
        let upstream_api_key = api_key
            .map(UpstreamApiKey::new)
            .ok_or(CredentialError::IncompleteCredentials {
                missing: vec![API_KEY_FIELD],
            })?;

        Ok(RequestCredentials {
            upstream_url,
            upstream_api_key,
        })
    }
}

impl Default for CredentialExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a raw header value with both fields mandatory
pub fn extract(raw_header: &str) -> Result<RequestCredentials, CredentialError> {
    CredentialExtractor::new().extract(raw_header)
}

/// First non-empty string among `names`; empty strings count as absent
fn string_field(
    fields: &Map<String, Value>,
    names: &[&'static str],
) -> Result<Option<String>, CredentialError> {
    for name in names {
        match fields.get(*name) {
            None | Some(Value::Null) => continue,
            Some(Value::String(s)) if s.trim().is_empty() => continue,
            Some(Value::String(s)) => return Ok(Some(s.trim().to_string())),
            Some(_) => {
                return Err(CredentialError::Malformed(format!(
                    "field '{}' must be a string",
                    name
                )));
            }
        }
    }
    Ok(None)
}

fn parse_upstream_url(raw: &str) -> Result<Url, CredentialError> {
    let url = Url::parse(raw).map_err(|e| CredentialError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(CredentialError::InvalidUrl(format!(
                "scheme must be http or https, got '{}'",
                scheme
            )));
        }
    }
    if url.host_str().is_none() {
        return Err(CredentialError::InvalidUrl("URL has no host".to_string()));
    }
    Ok(url)
}
