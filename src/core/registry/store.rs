//! Model registry storage
//!
//! Readers load an immutable snapshot without locking. Writers serialize on a
//! mutex, build the next snapshot from the current one and publish it in a
//! single swap, so a rejected write never leaves partial state behind.

use super::error::{DuplicateError, NotFoundError};
use super::types::{ModelEntry, ProviderRecord};
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

type ModelKey = (String, String);

/// Immutable view of the registry at one point in time
#[derive(Debug, Clone, Default)]
pub struct RegistrySnapshot {
    providers: HashMap<String, ProviderRecord>,
    models: BTreeMap<ModelKey, ModelEntry>,
}

impl RegistrySnapshot {
    /// Provider record by id
    pub fn provider(&self, provider_id: &str) -> Option<&ProviderRecord> {
        self.providers.get(provider_id)
    }

    /// Model entry by its `(provider_id, model_id)` pair
    pub fn model(&self, provider_id: &str, model_id: &str) -> Option<&ModelEntry> {
        self.models
            .get(&(provider_id.to_string(), model_id.to_string()))
    }

    /// Resolve a registered pair to its provider record
    pub fn resolve(&self, provider_id: &str, model_id: &str) -> Result<ProviderRecord, NotFoundError> {
        if self.model(provider_id, model_id).is_none() {
            return Err(NotFoundError::Model {
                provider_id: provider_id.to_string(),
                model_id: model_id.to_string(),
            });
        }

        self.provider(provider_id)
            .cloned()
            .ok_or_else(|| NotFoundError::Provider {
                provider_id: provider_id.to_string(),
                model_id: model_id.to_string(),
            })
    }

    /// Registered models ordered by provider then model id
    pub fn models(&self) -> impl Iterator<Item = &ModelEntry> {
        self.models.values()
    }

    pub fn providers(&self) -> impl Iterator<Item = &ProviderRecord> {
        self.providers.values()
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }
}

/// Mapping from logical model ids to provider records
pub struct ModelRegistry {
    current: ArcSwap<RegistrySnapshot>,
    writer: Mutex<()>,
}

impl ModelRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(RegistrySnapshot::default()),
            writer: Mutex::new(()),
        }
    }

    /// Build a registry from static configuration, providers first
    pub fn from_parts<P, M>(providers: P, models: M) -> Result<Self, DuplicateError>
    where
        P: IntoIterator<Item = ProviderRecord>,
        M: IntoIterator<Item = ModelEntry>,
    {
        let registry = Self::new();
        for provider in providers {
            registry.register_provider(provider)?;
        }
        for model in models {
            registry.register(model)?;
        }
        Ok(registry)
    }

    /// Current snapshot; stays valid even if a writer publishes a newer one
    pub fn snapshot(&self) -> Arc<RegistrySnapshot> {
        self.current.load_full()
    }

    /// Record a provider. Fails only when the id is already taken.
    pub fn register_provider(&self, record: ProviderRecord) -> Result<(), DuplicateError> {
        let _guard = self.writer.lock();
        let current = self.current.load();

        if current.providers.contains_key(&record.provider_id) {
            return Err(DuplicateError::Provider {
                provider_id: record.provider_id,
            });
        }

        info!(
            provider_id = %record.provider_id,
            kind = %record.kind,
            has_default_url = record.default_base_url.is_some(),
            "Registered provider"
        );

        let mut next = RegistrySnapshot::clone(&current);
        next.providers.insert(record.provider_id.clone(), record);
        self.current.store(Arc::new(next));
        Ok(())
    }

    /// Record a model. No upstream is contacted and the provider is not
    /// checked; the only failure is a duplicate `(provider_id, model_id)`.
    pub fn register(&self, entry: ModelEntry) -> Result<(), DuplicateError> {
        let _guard = self.writer.lock();
        let current = self.current.load();
        let key = (entry.provider_id.clone(), entry.model_id.clone());

        if current.models.contains_key(&key) {
            return Err(DuplicateError::Model {
                provider_id: entry.provider_id,
                model_id: entry.model_id,
            });
        }

        if !current.providers.contains_key(&entry.provider_id) {
            debug!(
                provider_id = %entry.provider_id,
                model_id = %entry.model_id,
                "Model registered before its provider"
            );
        }

        info!(
            model = %entry.identifier(),
            model_type = entry.model_type.as_str(),
            "Registered model"
        );

        let mut next = RegistrySnapshot::clone(&current);
        next.models.insert(key, entry);
        self.current.store(Arc::new(next));
        Ok(())
    }

    /// Resolve a registered pair to its provider record. Never touches the network.
    pub fn resolve(&self, provider_id: &str, model_id: &str) -> Result<ProviderRecord, NotFoundError> {
        self.current.load().resolve(provider_id, model_id)
    }

    pub fn get_model(&self, provider_id: &str, model_id: &str) -> Option<ModelEntry> {
        self.current.load().model(provider_id, model_id).cloned()
    }

    pub fn list_models(&self) -> Vec<ModelEntry> {
        self.current.load().models().cloned().collect()
    }

    pub fn list_providers(&self) -> Vec<ProviderRecord> {
        let mut providers: Vec<_> = self.current.load().providers().cloned().collect();
        providers.sort_by(|a, b| a.provider_id.cmp(&b.provider_id));
        providers
    }

    pub fn len(&self) -> usize {
        self.current.load().model_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snapshot = self.current.load();
        f.debug_struct("ModelRegistry")
            .field("provider_count", &snapshot.provider_count())
            .field("model_count", &snapshot.model_count())
            .finish()
    }
}
