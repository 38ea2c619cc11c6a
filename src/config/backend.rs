//! Backend configuration for inference providers

use serde::Deserialize;

/// Configuration for a single model backend
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Model identifier sent to the API
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key; falls back to the GROQ_API_KEY environment variable
    pub api_key: Option<String>,

    /// Whether this backend participates in the fallback chain
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Timeout in seconds; falls back to the global default
    pub timeout: Option<u64>,
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".into()
}

fn default_enabled() -> bool {
    true
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            base_url: default_base_url(),
            api_key: None,
            enabled: true,
            timeout: None,
        }
    }
}

impl BackendConfig {
    /// Create a config for a model on the default provider
    pub fn for_model(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }
}
