//! Delegate configuration.

use std::time::Duration;

/// Configuration for the local LLM delegate.
///
/// Defaults target a stock Ollama install. The timeout is not optional:
/// every delegate call is bounded by it so a wedged model server can never
/// stall triage.
#[derive(Debug, Clone)]
pub struct DelegateConfig {
    /// Base URL of the model server.
    pub base_url: String,
    /// Model name passed on every generation call.
    pub model: String,
    /// Sampling temperature for generations.
    pub temperature: f32,
    /// Hard per-request timeout.
    pub timeout: Duration,
}

impl Default for DelegateConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".into(),
            model: "llama3".into(),
            temperature: 0.7,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DelegateConfig {
    /// Load from environment, returning `None` when no delegate is
    /// configured (the engine then runs deterministic-only).
    ///
    /// - `MAILTRIAGE_OLLAMA_URL`: required; gates the whole config.
    /// - `MAILTRIAGE_OLLAMA_MODEL`: default `llama3`.
    /// - `MAILTRIAGE_OLLAMA_TEMPERATURE`: default `0.7`.
    /// - `MAILTRIAGE_OLLAMA_TIMEOUT_SECS`: default `30`.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("MAILTRIAGE_OLLAMA_URL").ok()?;

        let model =
            std::env::var("MAILTRIAGE_OLLAMA_MODEL").unwrap_or_else(|_| "llama3".to_string());

        let temperature: f32 = std::env::var("MAILTRIAGE_OLLAMA_TEMPERATURE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0.7);

        let timeout_secs: u64 = std::env::var("MAILTRIAGE_OLLAMA_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        Some(Self {
            base_url,
            model,
            temperature,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
