//! End-to-end tests through the HTTP app

#[cfg(test)]
mod tests {
    use crate::common::fixtures::config_for_upstream;
    use crate::common::{ChatRequestFactory, ChunkedUpstream, EndlessUpstream, ProviderDataFactory};
    use actix_web::http::StatusCode;
    use actix_web::{test, web};
    use futures::StreamExt;
    use passthrough_gateway::config::Config;
    use passthrough_gateway::server::server::HttpServer;
    use passthrough_gateway::utils::error::ErrorResponse;
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn app_state(config: &Config) -> web::Data<passthrough_gateway::server::AppState> {
        web::Data::new(HttpServer::new(config).unwrap().state().clone())
    }

    /// Upstream 401 reaches the client with status and body intact
    #[actix_web::test]
    async fn test_upstream_error_status_relayed() {
        let upstream = MockServer::start().await;
        let upstream_body = r#"{"error":{"message":"Incorrect API key provided"}}"#;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_raw(upstream_body, "application/json"))
            .mount(&upstream)
            .await;

        let config = config_for_upstream(&upstream.uri(), "");
        let app = test::init_service(HttpServer::create_app(app_state(&config))).await;

        let req = test::TestRequest::post()
            .uri("/v1/chat/completions")
            .insert_header((
                ProviderDataFactory::HEADER,
                ProviderDataFactory::full(&upstream.uri()),
            ))
            .set_json(ChatRequestFactory::simple("mock/gpt-4o"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body = test::read_body(resp).await;
        assert_eq!(body, upstream_body.as_bytes());
    }

    /// Embeddings go through the same path with the body untouched
    #[actix_web::test]
    async fn test_embeddings_passthrough() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header(
                "authorization",
                format!("Bearer {}", ProviderDataFactory::API_KEY).as_str(),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"object":"list","data":[{"embedding":[0.1,0.2]}]}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&upstream)
            .await;

        let config = config_for_upstream(&upstream.uri(), "");
        let app = test::init_service(HttpServer::create_app(app_state(&config))).await;

        let payload = r#"{"model":"mock/text-embedding-3-small","input":"hello",  "encoding_format":"float"}"#;
        let req = test::TestRequest::post()
            .uri("/v1/embeddings")
            .insert_header((
                ProviderDataFactory::HEADER,
                ProviderDataFactory::full(&upstream.uri()),
            ))
            .insert_header(("content-type", "application/json"))
            .set_payload(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let received = upstream.received_requests().await.unwrap();
        assert_eq!(received[0].body, payload.as_bytes());
    }

    /// Falling back to the provider default when the URL is optional
    #[actix_web::test]
    async fn test_default_url_fallback() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
            .expect(1)
            .mount(&upstream)
            .await;

        let config = config_for_upstream(&upstream.uri(), "  require_upstream_url: false");
        let app = test::init_service(HttpServer::create_app(app_state(&config))).await;

        let req = test::TestRequest::post()
            .uri("/v1/chat/completions")
            .insert_header((ProviderDataFactory::HEADER, ProviderDataFactory::key_only()))
            .set_json(ChatRequestFactory::simple("mock/gpt-4o"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    /// Provider with neither a request URL nor a default
    #[actix_web::test]
    async fn test_no_upstream_url() {
        let config = config_for_upstream("https://api.openai.com", "  require_upstream_url: false");
        let app = test::init_service(HttpServer::create_app(app_state(&config))).await;

        let req = test::TestRequest::post()
            .uri("/v1/chat/completions")
            .insert_header((ProviderDataFactory::HEADER, ProviderDataFactory::key_only()))
            .set_json(ChatRequestFactory::simple("azure/gpt-4"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error.code, "NO_UPSTREAM");
    }

    /// Caller-supplied private hosts are refused when the guard is on
    #[actix_web::test]
    async fn test_blocked_private_upstream() {
        let config = config_for_upstream("https://api.openai.com", "  block_private_upstreams: true");
        let app = test::init_service(HttpServer::create_app(app_state(&config))).await;

        let req = test::TestRequest::post()
            .uri("/v1/chat/completions")
            .insert_header((
                ProviderDataFactory::HEADER,
                ProviderDataFactory::full("http://127.0.0.1:8080"),
            ))
            .set_json(ChatRequestFactory::simple("mock/gpt-4o"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    /// Unreachable upstream is a 502 without the key in the body
    #[actix_web::test]
    async fn test_unreachable_upstream() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{}", port);

        let config = config_for_upstream(&url, "");
        let app = test::init_service(HttpServer::create_app(app_state(&config))).await;

        let req = test::TestRequest::post()
            .uri("/v1/chat/completions")
            .insert_header((ProviderDataFactory::HEADER, ProviderDataFactory::full(&url)))
            .set_json(ChatRequestFactory::simple("mock/gpt-4o"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body = test::read_body(resp).await;
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("UPSTREAM_UNREACHABLE"));
        assert!(!text.contains(ProviderDataFactory::API_KEY));
    }

    /// Slow non-streaming upstream is a 504
    #[actix_web::test]
    async fn test_upstream_timeout() {
        let upstream = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("{}", "application/json")
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&upstream)
            .await;

        let config = config_for_upstream(&upstream.uri(), "  request_timeout: 1");
        let app = test::init_service(HttpServer::create_app(app_state(&config))).await;

        let req = test::TestRequest::post()
            .uri("/v1/chat/completions")
            .insert_header((
                ProviderDataFactory::HEADER,
                ProviderDataFactory::full(&upstream.uri()),
            ))
            .set_json(ChatRequestFactory::simple("mock/gpt-4o"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
    }

    /// Streamed replies carry anti-buffering headers and the upstream bytes
    #[actix_web::test]
    async fn test_streaming_response_headers() {
        let upstream = ChunkedUpstream::start(
            vec![&b"data: {\"n\":1}\n\n"[..], &b"data: [DONE]\n\n"[..]],
            Duration::from_millis(10),
        )
        .await;
        let url = upstream.url();

        let config = config_for_upstream(&url, "");
        let app = test::init_service(HttpServer::create_app(app_state(&config))).await;

        let req = test::TestRequest::post()
            .uri("/v1/chat/completions")
            .insert_header((ProviderDataFactory::HEADER, ProviderDataFactory::full(&url)))
            .set_json(ChatRequestFactory::streaming("mock/gpt-4o"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers().get("content-type").unwrap(), "text/event-stream");
        assert_eq!(resp.headers().get("cache-control").unwrap(), "no-cache");
        assert_eq!(resp.headers().get("x-accel-buffering").unwrap(), "no");
        assert!(resp.headers().get("transfer-encoding").is_none());

        let body = test::read_body(resp).await;
        assert_eq!(body, &b"data: {\"n\":1}\n\ndata: [DONE]\n\n"[..]);
    }

    /// Over a real socket: chunks reach the client one by one, in order
    #[actix_web::test]
    async fn test_streaming_over_socket() {
        let upstream = ChunkedUpstream::start(
            vec![&b"a"[..], &b"b"[..], &b"c"[..]],
            Duration::from_millis(100),
        )
        .await;
        let url = upstream.url();

        let config = config_for_upstream(&url, "");
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let gateway_addr = listener.local_addr().unwrap();
        let server = HttpServer::new(&config).unwrap().run(listener).unwrap();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        let response = reqwest::Client::new()
            .post(format!("http://{}/v1/chat/completions", gateway_addr))
            .header(ProviderDataFactory::HEADER, ProviderDataFactory::full(&url))
            .json(&ChatRequestFactory::streaming("mock/gpt-4o"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let chunks: Vec<bytes::Bytes> = response
            .bytes_stream()
            .map(|chunk| chunk.unwrap())
            .collect()
            .await;
        assert_eq!(chunks, vec!["a", "b", "c"]);

        handle.stop(false).await;
    }

    /// Client hangs up mid-stream: the upstream connection closes within 5s
    #[actix_web::test]
    async fn test_client_disconnect_cancels_upstream() {
        let upstream = EndlessUpstream::start().await;
        let url = upstream.url();

        let config = config_for_upstream(&url, "");
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let gateway_addr = listener.local_addr().unwrap();
        let server = HttpServer::new(&config).unwrap().run(listener).unwrap();
        let handle = server.handle();
        actix_web::rt::spawn(server);

        let response = reqwest::Client::new()
            .post(format!("http://{}/v1/chat/completions", gateway_addr))
            .header(ProviderDataFactory::HEADER, ProviderDataFactory::full(&url))
            .json(&json!({"model": "mock/gpt-4o", "stream": true, "messages": []}))
            .send()
            .await
            .unwrap();

        let mut stream = response.bytes_stream();
        let first = stream.next().await.unwrap().unwrap();
        assert!(first.starts_with(b"data: "));
        drop(stream);

        let closed = tokio::time::timeout(Duration::from_secs(5), upstream.closed).await;
        assert!(closed.is_ok(), "upstream connection still open 5s after client left");

        handle.stop(false).await;
    }
}
