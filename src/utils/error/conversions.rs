//! Type conversions for GatewayError

use super::types::GatewayError;
use crate::core::router::RouteError;

// A routing miss is reported the same way as a direct registry lookup miss
impl From<RouteError> for GatewayError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::NotFound(e) => GatewayError::NotFound(e),
            other => GatewayError::Route(other),
        }
    }
}
