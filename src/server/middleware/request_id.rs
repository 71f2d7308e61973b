//! Request ID middleware
//!
//! Keeps a caller-supplied `x-request-id` or assigns a fresh one, and echoes
//! it on the response.

use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use tracing::debug;
use uuid::Uuid;

/// Header carrying the request id
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied id that is kept as-is
const MAX_REQUEST_ID_LEN: usize = 128;

tokio::task_local! {
    static CURRENT_REQUEST_ID: String;
}

/// Id of the request being handled, when called under [`RequestIdMiddleware`]
pub fn current_request_id() -> Option<String> {
    CURRENT_REQUEST_ID.try_with(Clone::clone).ok()
}

/// Request ID middleware for Actix-web
pub struct RequestIdMiddleware;

impl<S, B> Transform<S, ServiceRequest> for RequestIdMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RequestIdMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestIdMiddlewareService { service }))
    }
}

/// Service implementation for request ID middleware
pub struct RequestIdMiddlewareService<S> {
    service: S,
}

fn incoming_request_id(req: &ServiceRequest) -> Option<HeaderValue> {
    req.headers()
        .get(REQUEST_ID_HEADER)
        .filter(|v| !v.is_empty() && v.len() <= MAX_REQUEST_ID_LEN && v.to_str().is_ok())
        .cloned()
}

impl<S, B> Service<ServiceRequest> for RequestIdMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let request_id = incoming_request_id(&req).unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("invalid"))
        });

        req.headers_mut().insert(
            HeaderName::from_static(REQUEST_ID_HEADER),
            request_id.clone(),
        );

        let id = request_id.to_str().unwrap_or_default().to_string();
        debug!(request_id = %id, path = req.path(), "Processing request");

        // Handlers and their error responses run inside this scope
        let fut = CURRENT_REQUEST_ID.scope(id, self.service.call(req));
        Box::pin(async move {
            let mut res = fut.await?;
            res.headers_mut()
                .insert(HeaderName::from_static(REQUEST_ID_HEADER), request_id);
            Ok(res)
        })
    }
}
