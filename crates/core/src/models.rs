//! # SiteCrew Models
//!
//! Inference endpoint configuration shared by every agent in the crew.
//! The endpoint is expected to speak the OpenAI chat-completions API; the
//! default points at a local Ollama server.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default OpenAI-compatible base URL (local Ollama)
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

/// Default model served by the local endpoint
pub const DEFAULT_MODEL: &str = "qwen2.5-coder";

/// Placeholder credential; local endpoints ignore it
pub const PLACEHOLDER_API_KEY: &str = "NA";

/// Configuration for the inference endpoint
///
/// Built once at startup and handed to the engine by value. Nothing in the
/// crew reads endpoint settings from the process environment.
///
/// ## Example
/// ```rust
/// use sitecrew_core::models::ModelConfig;
///
/// let config = ModelConfig::new("llama3.1").with_base_url("http://gpu-box:11434/v1/");
/// assert_eq!(
///     config.chat_completions_url(),
///     "http://gpu-box:11434/v1/chat/completions"
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelConfig {
    /// OpenAI-compatible API base URL
    pub base_url: String,
    /// Model name (e.g., "qwen2.5-coder", "llama3.1")
    pub model: String,
    /// Bearer credential sent with every request
    pub api_key: String,
    /// Optional per-request timeout; `None` waits indefinitely
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: PLACEHOLDER_API_KEY.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl ModelConfig {
    /// Create a config for a model on the default local endpoint
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Self::default()
        }
    }

    /// Set base URL
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the bearer credential
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = key.into();
        self
    }

    /// Bound each inference request
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    /// Full URL of the chat-completions route
    pub fn chat_completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ModelConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434/v1");
        assert_eq!(config.model, "qwen2.5-coder");
        assert_eq!(config.api_key, "NA");
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_chat_completions_url() {
        let config = ModelConfig::default();
        assert_eq!(
            config.chat_completions_url(),
            "http://localhost:11434/v1/chat/completions"
        );

        let config = config.with_base_url("http://127.0.0.1:8000/v1///");
        assert_eq!(
            config.chat_completions_url(),
            "http://127.0.0.1:8000/v1/chat/completions"
        );
    }

    #[test]
    fn test_builder_methods() {
        let config = ModelConfig::new("llama3.1")
            .with_api_key("sk-local")
            .with_timeout_secs(30);
        assert_eq!(config.model, "llama3.1");
        assert_eq!(config.api_key, "sk-local");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_model_config_serialization() {
        let config = ModelConfig::new("qwen2.5-coder");
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("qwen2.5-coder"));
        assert!(json.contains("11434"));
    }
}
