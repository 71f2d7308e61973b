//! Model registry
//!
//! Maps `(provider_id, model_id)` pairs to provider records. Populated from
//! static configuration at startup; never filled by upstream discovery.

mod error;
mod store;
mod types;

pub use error::{DuplicateError, NotFoundError};
pub use store::{ModelRegistry, RegistrySnapshot};
pub use types::{ModelEntry, ModelType, ProviderKind, ProviderRecord};
