//! Registry data model: providers, their kinds, and registered models

use crate::core::credentials::UpstreamApiKey;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// How the gateway talks to a provider.
///
/// Each variant fixes its own auth header and path-suffix policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProviderKind {
    /// Any upstream exposing the OpenAI REST surface with bearer auth
    #[default]
    #[serde(
        rename = "openai_compatible",
        alias = "openai",
        alias = "OPENAI_COMPATIBLE"
    )]
    OpenAiCompatible,
    /// Azure OpenAI deployments (`api-key` header, no `/v1` prefix)
    #[serde(rename = "azure_openai", alias = "azure", alias = "AZURE_OPENAI")]
    AzureOpenAi,
}

impl ProviderKind {
    /// Stable identifier used in config files and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAiCompatible => "openai_compatible",
            ProviderKind::AzureOpenAi => "azure_openai",
        }
    }

    /// Header carrying the caller's upstream key
    pub fn auth_header_name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAiCompatible => "authorization",
            ProviderKind::AzureOpenAi => "api-key",
        }
    }

    /// Header value carrying the caller's upstream key
    pub fn auth_header_value(&self, key: &UpstreamApiKey) -> String {
        match self {
            ProviderKind::OpenAiCompatible => format!("Bearer {}", key.expose()),
            ProviderKind::AzureOpenAi => key.expose().to_string(),
        }
    }

    /// Portion of the inbound path appended to the upstream base path.
    ///
    /// OpenAI-compatible bases are usually given without `/v1`; when the
    /// operator includes it the inbound `/v1` is dropped so it is not doubled.
    /// Azure deployment URLs never take the `/v1` prefix.
    pub fn path_suffix<'a>(&self, base_path: &str, inbound_path: &'a str) -> &'a str {
        let without_version = inbound_path
            .strip_prefix("/v1")
            .filter(|rest| rest.is_empty() || rest.starts_with('/'));

        match (self, without_version) {
            (ProviderKind::AzureOpenAi, Some(rest)) => rest,
            (ProviderKind::OpenAiCompatible, Some(rest))
                if base_path.trim_end_matches('/').ends_with("/v1") =>
            {
                rest
            }
            _ => inbound_path,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of an upstream provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderRecord {
    /// Logical provider id, the prefix of `provider_id/model_id`
    #[serde(alias = "name")]
    pub provider_id: String,
    /// Wire conventions of the upstream
    #[serde(default)]
    pub kind: ProviderKind,
    /// Base URL used when the caller does not supply one
    #[serde(default)]
    pub default_base_url: Option<Url>,
}

impl ProviderRecord {
    pub fn new(provider_id: impl Into<String>, kind: ProviderKind) -> Self {
        Self {
            provider_id: provider_id.into(),
            kind,
            default_base_url: None,
        }
    }

    pub fn with_default_base_url(mut self, url: Url) -> Self {
        self.default_base_url = Some(url);
        self
    }
}

/// What a registered model is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelType {
    #[default]
    #[serde(alias = "LLM")]
    Llm,
    #[serde(alias = "EMBEDDING")]
    Embedding,
}

impl ModelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelType::Llm => "llm",
            ModelType::Embedding => "embedding",
        }
    }
}

/// A model the gateway will route to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub model_id: String,
    pub provider_id: String,
    #[serde(default)]
    pub model_type: ModelType,
}

impl ModelEntry {
    pub fn new(
        provider_id: impl Into<String>,
        model_id: impl Into<String>,
        model_type: ModelType,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            provider_id: provider_id.into(),
            model_type,
        }
    }

    /// The `provider_id/model_id` string clients send
    pub fn identifier(&self) -> String {
        format!("{}/{}", self.provider_id, self.model_id)
    }
}
