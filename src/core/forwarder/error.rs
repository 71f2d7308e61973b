//! Forwarder error types

use thiserror::Error;

/// Failures while talking to the upstream.
///
/// Upstream HTTP error statuses are not errors here; they are relayed as
/// ordinary responses.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForwardError {
    #[error("invalid upstream URL: {0}")]
    InvalidUpstreamUrl(String),

    #[error("upstream_api_key contains characters not allowed in an HTTP header")]
    InvalidApiKey,

    #[error("upstream unreachable: {message}")]
    UpstreamUnreachable { message: String, timed_out: bool },

    #[error("upstream stream interrupted: {0}")]
    StreamInterrupted(String),
}

impl ForwardError {
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::UpstreamUnreachable {
            message: message.into(),
            timed_out: false,
        }
    }

    pub fn timed_out(message: impl Into<String>) -> Self {
        Self::UpstreamUnreachable {
            message: message.into(),
            timed_out: true,
        }
    }

    /// Map a client error without echoing the URL, which may be caller-supplied
    pub(crate) fn from_reqwest(error: reqwest::Error) -> Self {
        let timed_out = error.is_timeout();
        let message = error.without_url().to_string();
        if timed_out {
            Self::timed_out(message)
        } else {
            Self::unreachable(message)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::UpstreamUnreachable { timed_out: true, .. })
    }
}
