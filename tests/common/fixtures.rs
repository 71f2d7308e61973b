//! Test fixtures and data factories

use passthrough_gateway::config::Config;
use passthrough_gateway::core::registry::{
    ModelEntry, ModelRegistry, ModelType, ProviderKind, ProviderRecord,
};
use serde_json::{Value, json};
use url::Url;

/// Factory for populated registries
pub struct RegistryFactory;

impl RegistryFactory {
    /// `openai` with a default URL, `bare` without one, `azure` as Azure
    pub fn standard() -> ModelRegistry {
        ModelRegistry::from_parts(
            vec![
                ProviderRecord::new("openai", ProviderKind::OpenAiCompatible)
                    .with_default_base_url(Url::parse("https://api.openai.com").unwrap()),
                ProviderRecord::new("bare", ProviderKind::OpenAiCompatible),
                ProviderRecord::new("azure", ProviderKind::AzureOpenAi),
            ],
            vec![
                ModelEntry::new("openai", "gpt-4o", ModelType::Llm),
                ModelEntry::new("openai", "text-embedding-3-small", ModelType::Embedding),
                ModelEntry::new("bare", "local-model", ModelType::Llm),
                ModelEntry::new("azure", "gpt-4", ModelType::Llm),
            ],
        )
        .expect("fixture registry has no duplicates")
    }
}

/// Factory for side-channel header values
pub struct ProviderDataFactory;

impl ProviderDataFactory {
    pub const HEADER: &'static str = "X-Provider-Data";
    pub const API_KEY: &'static str = "sk-test-key-0123456789";

    /// Both fields present
    pub fn full(upstream_url: &str) -> String {
        json!({
            "upstream_api_key": Self::API_KEY,
            "upstream_url": upstream_url,
        })
        .to_string()
    }

    /// Key only
    pub fn key_only() -> String {
        json!({ "upstream_api_key": Self::API_KEY }).to_string()
    }
}

/// Factory for OpenAI-style request bodies
pub struct ChatRequestFactory;

impl ChatRequestFactory {
    pub fn simple(model: &str) -> Value {
        json!({
            "model": model,
            "messages": [{"role": "user", "content": "Hello"}],
        })
    }

    pub fn streaming(model: &str) -> Value {
        let mut body = Self::simple(model);
        body["stream"] = json!(true);
        body
    }
}

/// Gateway config whose `mock` provider defaults to `upstream`.
///
/// `passthrough_extra` is spliced into the `passthrough:` block and must be
/// indented by two spaces.
pub fn config_for_upstream(upstream: &str, passthrough_extra: &str) -> Config {
    let yaml = format!(
        r#"
server:
  host: 127.0.0.1
  port: 18000
  workers: 1
passthrough:
  credential_header: X-Provider-Data
{passthrough_extra}
providers:
  - provider_id: mock
    default_base_url: {upstream}
  - provider_id: azure
    kind: azure_openai
models:
  - provider_id: mock
    model_id: gpt-4o
  - provider_id: mock
    model_id: text-embedding-3-small
    model_type: embedding
  - provider_id: azure
    model_id: gpt-4
"#
    );
    Config::from_yaml_str(&yaml).expect("fixture config is valid")
}
