//! HTTP response handling for errors

use super::types::GatewayError;
use crate::core::credentials::CredentialError;
use crate::core::forwarder::ForwardError;
use crate::core::registry::{DuplicateError, NotFoundError};
use crate::core::router::RouteError;
use crate::server::middleware::current_request_id;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl GatewayError {
    /// Machine-readable code carried in the error body
    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::Config(_) => "CONFIG_ERROR",
            GatewayError::Duplicate(DuplicateError::Model { .. }) => "MODEL_ALREADY_REGISTERED",
            GatewayError::Duplicate(DuplicateError::Provider { .. }) => {
                "PROVIDER_ALREADY_REGISTERED"
            }
            GatewayError::NotFound(NotFoundError::Model { .. }) => "MODEL_NOT_FOUND",
            GatewayError::NotFound(NotFoundError::Provider { .. }) => "PROVIDER_NOT_FOUND",
            GatewayError::Credential(e) => match e {
                CredentialError::MissingHeader { .. } => "MISSING_PROVIDER_DATA",
                CredentialError::Malformed(_) => "MALFORMED_PROVIDER_DATA",
                CredentialError::IncompleteCredentials { .. } => "INCOMPLETE_CREDENTIALS",
                CredentialError::InvalidUrl(_) => "INVALID_UPSTREAM_URL",
            },
            GatewayError::Route(RouteError::InvalidModelRef(_)) => "INVALID_MODEL_REFERENCE",
            GatewayError::Route(RouteError::NoUpstream { .. }) => "NO_UPSTREAM",
            GatewayError::Route(RouteError::BlockedUpstream(_)) => "UPSTREAM_BLOCKED",
            GatewayError::Route(RouteError::NotFound(_)) => "MODEL_NOT_FOUND",
            GatewayError::Forward(e) if e.is_timeout() => "UPSTREAM_TIMEOUT",
            GatewayError::Forward(ForwardError::InvalidApiKey) => "INVALID_UPSTREAM_API_KEY",
            GatewayError::Forward(ForwardError::InvalidUpstreamUrl(_)) => "INVALID_UPSTREAM_URL",
            GatewayError::Forward(_) => "UPSTREAM_UNREACHABLE",
            GatewayError::BadRequest(_) => "BAD_REQUEST",
            GatewayError::Forbidden(_) => "FORBIDDEN",
            _ => "INTERNAL_ERROR",
        }
    }
}

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Duplicate(_) => StatusCode::CONFLICT,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Credential(_) => StatusCode::BAD_REQUEST,
            GatewayError::Route(RouteError::BlockedUpstream(_)) => StatusCode::FORBIDDEN,
            GatewayError::Route(RouteError::NotFound(_)) => StatusCode::NOT_FOUND,
            GatewayError::Route(_) => StatusCode::BAD_REQUEST,
            GatewayError::Forward(e) if e.is_timeout() => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Forward(ForwardError::InvalidApiKey)
            | GatewayError::Forward(ForwardError::InvalidUpstreamUrl(_)) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::Forward(_) => StatusCode::BAD_GATEWAY,
            GatewayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            GatewayError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status_code = self.status_code();
        let message = match self {
            GatewayError::Config(_)
            | GatewayError::Io(_)
            | GatewayError::Yaml(_)
            | GatewayError::Server(_) => "An internal error occurred".to_string(),
            _ => self.to_string(),
        };

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message,
                timestamp: chrono::Utc::now().timestamp(),
                request_id: current_request_id(),
            },
        };

        HttpResponse::build(status_code).json(error_response)
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    /// `x-request-id` of the failed request; absent outside the middleware
    pub request_id: Option<String>,
}
