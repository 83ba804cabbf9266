//! Inference configuration for the chat endpoint

use crate::llm::context::DEFAULT_CONTEXT_ENTRIES;
use crate::llm::prompts::SYSTEM_PROMPT;

/// Environment variable overriding the chat completions URL.
pub const ENDPOINT_ENV: &str = "BANTER_ENDPOINT";

/// Environment variable overriding the model name sent with requests.
pub const MODEL_ENV: &str = "BANTER_MODEL";

/// Default endpoint, an OpenAI-compatible server on localhost.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/v1/chat/completions";

/// Configuration for streaming chat requests
#[derive(Clone, Debug)]
pub struct InferenceConfig {
    /// Chat completions URL (the full path, not just the host)
    pub endpoint: String,

    /// Model name, omitted from requests when the endpoint serves a
    /// single model
    pub model: Option<String>,

    /// Maximum tokens to generate per response
    pub max_tokens: u32,

    /// Temperature for sampling (low keeps replies focused)
    pub temperature: f32,

    /// Sampling seed for reproducible responses
    pub seed: u64,

    /// Number of conversation turns kept as request context
    pub context_entries: usize,

    /// System preamble sent ahead of every conversation
    pub system_prompt: String,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: None,
            max_tokens: 500,
            temperature: 0.1,
            seed: 0,
            context_entries: DEFAULT_CONTEXT_ENTRIES,
            system_prompt: SYSTEM_PROMPT.to_string(),
        }
    }
}

impl InferenceConfig {
    /// Create a configuration pointing at the given endpoint
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Create a configuration from the environment, falling back to
    /// defaults for anything unset
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(endpoint) = std::env::var(ENDPOINT_ENV) {
            config.endpoint = endpoint;
        }
        if let Ok(model) = std::env::var(MODEL_ENV) {
            config.model = Some(model);
        }
        config
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set maximum tokens per response
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the sampling seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set how many turns the rolling context keeps
    pub fn with_context_entries(mut self, context_entries: usize) -> Self {
        self.context_entries = context_entries;
        self
    }

    /// Set the system preamble
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = InferenceConfig::default();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.model, None);
        assert_eq!(config.max_tokens, 500);
        assert_eq!(config.temperature, 0.1);
        assert_eq!(config.seed, 0);
        assert_eq!(config.context_entries, DEFAULT_CONTEXT_ENTRIES);
    }

    #[test]
    fn test_builder_pattern() {
        let config = InferenceConfig::new("http://example.test/v1/chat/completions")
            .with_model("test-model")
            .with_max_tokens(64)
            .with_temperature(0.9)
            .with_context_entries(4);

        assert_eq!(config.endpoint, "http://example.test/v1/chat/completions");
        assert_eq!(config.model.as_deref(), Some("test-model"));
        assert_eq!(config.max_tokens, 64);
        assert_eq!(config.temperature, 0.9);
        assert_eq!(config.context_entries, 4);
    }
}
