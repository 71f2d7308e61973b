//! Registry error types

use thiserror::Error;

/// A registration collided with an existing key
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DuplicateError {
    #[error("model '{provider_id}/{model_id}' is already registered")]
    Model {
        provider_id: String,
        model_id: String,
    },

    #[error("provider '{provider_id}' is already registered")]
    Provider { provider_id: String },
}

/// A lookup matched nothing
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFoundError {
    #[error("model '{provider_id}/{model_id}' is not registered")]
    Model {
        provider_id: String,
        model_id: String,
    },

    #[error("provider '{provider_id}' for model '{model_id}' is not registered")]
    Provider {
        provider_id: String,
        model_id: String,
    },
}
