//! Streaming relay tests against raw fake upstreams

#[cfg(test)]
mod tests {
    use crate::assert_ok;
    use crate::common::{ChatRequestFactory, ChunkedUpstream, EndlessUpstream, ProviderDataFactory};
    use bytes::Bytes;
    use futures::{StreamExt, TryStreamExt};
    use passthrough_gateway::core::credentials::{RequestCredentials, UpstreamApiKey};
    use passthrough_gateway::core::forwarder::{
        ForwardedBody, Forwarder, ForwarderOptions, InboundRequest,
    };
    use passthrough_gateway::core::registry::{ProviderKind, ProviderRecord};
    use passthrough_gateway::core::router::EffectiveRoute;
    use reqwest::Method;
    use reqwest::header::{HeaderName, HeaderValue};
    use std::time::Duration;
    use url::Url;

    fn effective_route(base: &str) -> EffectiveRoute {
        EffectiveRoute {
            resolved_provider: ProviderRecord::new("mock", ProviderKind::OpenAiCompatible),
            resolved_url: Url::parse(base).unwrap(),
            credentials: RequestCredentials::new(
                Some(Url::parse(base).unwrap()),
                UpstreamApiKey::new(ProviderDataFactory::API_KEY),
            ),
        }
    }

    fn streaming_request(upstream: &str) -> InboundRequest {
        let body = ChatRequestFactory::streaming("mock/gpt-4o");
        InboundRequest::new(Method::POST, "/v1/chat/completions")
            .with_header(
                HeaderName::from_static("x-provider-data"),
                HeaderValue::from_str(&ProviderDataFactory::full(upstream)).unwrap(),
            )
            .with_body(serde_json::to_vec(&body).unwrap())
            .with_stream_requested(true)
    }

    /// Chunks arrive in order with their boundaries intact
    #[tokio::test]
    async fn test_stream_preserves_chunk_order_and_boundaries() {
        let upstream = ChunkedUpstream::start(
            vec![&b"a"[..], &b"b"[..], &b"c"[..]],
            Duration::from_millis(100),
        )
        .await;
        let url = upstream.url();

        let response = assert_ok!(
            Forwarder::new(ForwarderOptions::default())
                .unwrap()
                .forward(effective_route(&url), streaming_request(&url))
                .await
        );
        assert!(response.is_streaming());

        let ForwardedBody::Stream(stream) = response.body else {
            panic!("expected a streamed body");
        };
        let chunks: Vec<Bytes> = assert_ok!(stream.try_collect().await);
        assert_eq!(chunks, vec!["a", "b", "c"]);

        let head = upstream.request_head.await.unwrap().to_ascii_lowercase();
        assert!(head.contains(&format!("authorization: bearer {}", ProviderDataFactory::API_KEY).to_ascii_lowercase()));
        assert!(!head.contains("x-provider-data"));
    }

    /// An event stream the client did not ask for outlives the request timeout
    #[tokio::test]
    async fn test_unrequested_event_stream_not_cut_by_request_timeout() {
        let upstream = ChunkedUpstream::start(
            vec![&b"a"[..], &b"b"[..], &b"c"[..]],
            Duration::from_millis(600),
        )
        .await;
        let url = upstream.url();

        let options = ForwarderOptions {
            request_timeout: Duration::from_secs(1),
            ..ForwarderOptions::default()
        };
        let request = streaming_request(&url).with_stream_requested(false);

        let response = assert_ok!(
            Forwarder::new(options)
                .unwrap()
                .forward(effective_route(&url), request)
                .await
        );
        assert!(response.is_streaming());

        let ForwardedBody::Stream(stream) = response.body else {
            panic!("expected a streamed body");
        };
        let chunks: Vec<Bytes> = assert_ok!(stream.try_collect().await);
        assert_eq!(chunks, vec!["a", "b", "c"]);
    }

    /// Dropping the relay closes the upstream connection promptly
    #[tokio::test]
    async fn test_dropping_stream_closes_upstream() {
        let upstream = EndlessUpstream::start().await;
        let url = upstream.url();

        let response = assert_ok!(
            Forwarder::new(ForwarderOptions::default())
                .unwrap()
                .forward(effective_route(&url), streaming_request(&url))
                .await
        );
        let ForwardedBody::Stream(mut stream) = response.body else {
            panic!("expected a streamed body");
        };

        let first = stream.next().await.unwrap().unwrap();
        assert!(first.starts_with(b"data: "));
        drop(stream);

        let closed = tokio::time::timeout(Duration::from_secs(5), upstream.closed).await;
        assert!(closed.is_ok(), "upstream connection still open 5s after drop");
    }
}
