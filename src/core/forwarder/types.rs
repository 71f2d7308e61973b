//! Request and response values exchanged with the forwarder

use super::error::ForwardError;
use bytes::Bytes;
use futures::stream::BoxStream;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use std::fmt;

/// The parts of an inbound request the forwarder needs
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Path as received, e.g. `/v1/chat/completions`
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    /// Body bytes, forwarded without being parsed
    pub body: Bytes,
    /// The client asked for `stream: true`
    pub stream_requested: bool,
}

impl InboundRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
            body: Bytes::new(),
            stream_requested: false,
        }
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_stream_requested(mut self, stream: bool) -> Self {
        self.stream_requested = stream;
        self
    }
}

/// Upstream response body
pub enum ForwardedBody {
    /// Whole body, read before replying
    Buffered(Bytes),
    /// Chunks relayed as they arrive
    Stream(BoxStream<'static, Result<Bytes, ForwardError>>),
}

impl fmt::Debug for ForwardedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ForwardedBody::Buffered(bytes) => f
                .debug_tuple("Buffered")
                .field(&format_args!("{} bytes", bytes.len()))
                .finish(),
            ForwardedBody::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Upstream response with status and headers untouched apart from framing
#[derive(Debug)]
pub struct ForwardedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ForwardedBody,
}

impl ForwardedResponse {
    pub fn is_streaming(&self) -> bool {
        matches!(self.body, ForwardedBody::Stream(_))
    }

    /// Read the whole body, draining a stream if necessary
    pub async fn into_bytes(self) -> Result<Bytes, ForwardError> {
        use futures::TryStreamExt;

        match self.body {
            ForwardedBody::Buffered(bytes) => Ok(bytes),
            ForwardedBody::Stream(stream) => {
                let chunks: Vec<Bytes> = stream.try_collect().await?;
                Ok(Bytes::from(chunks.concat()))
            }
        }
    }
}
