//! Sensitive data redaction for logs
//!
//! Upstream keys reach the forwarder in auth headers and, occasionally, in
//! caller-supplied URLs. Anything logged from those places goes through here.

use reqwest::header::HeaderMap;
use url::Url;

/// Redacted value placeholder
pub const REDACTED: &str = "[REDACTED]";

/// Header names whose values never appear in logs
const SENSITIVE_HEADERS: &[&str] = &[
    "authorization",
    "proxy-authorization",
    "api-key",
    "x-api-key",
    "cookie",
    "set-cookie",
];

/// Query parameters whose values never appear in logs
const SENSITIVE_PARAMS: &[&str] = &["key", "api_key", "api-key", "token", "access_token", "sig"];

fn is_sensitive(name: &str, list: &[&str], extra: &[&str]) -> bool {
    list.iter()
        .chain(extra.iter())
        .any(|s| name.eq_ignore_ascii_case(s))
}

/// Header name/value pairs safe to log.
///
/// `extra` names additional headers to mask, such as the credential header.
pub fn redact_headers(headers: &HeaderMap, extra: &[&str]) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            let shown = if value.is_sensitive() || is_sensitive(name.as_str(), SENSITIVE_HEADERS, extra)
            {
                REDACTED.to_string()
            } else {
                value.to_str().unwrap_or("<binary>").to_string()
            };
            (name.as_str().to_string(), shown)
        })
        .collect()
}

/// URL safe to log: userinfo dropped, sensitive query values masked
pub fn redact_url(url: &Url) -> String {
    let mut redacted = url.clone();
    let _ = redacted.set_username("");
    let _ = redacted.set_password(None);

    if redacted.query().is_some() {
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| {
                let v = if is_sensitive(&k, SENSITIVE_PARAMS, &[]) {
                    REDACTED.to_string()
                } else {
                    v.into_owned()
                };
                (k.into_owned(), v)
            })
            .collect();
        redacted.query_pairs_mut().clear().extend_pairs(pairs);
    }

    redacted.to_string()
}
