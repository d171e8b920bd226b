//! Ollama-backed `LlmDelegate`.
//!
//! Speaks the local Ollama HTTP API: `GET /api/tags` as the availability
//! probe, `POST /api/generate` (non-streaming) for text generation. The
//! reqwest client is built with the configured timeout, so every call is
//! bounded.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::DelegateConfig;
use crate::delegate::{LlmDelegate, parse_categorization};
use crate::error::DelegateError;
use crate::lexicon::Lexicon;
use crate::types::{Categorization, Tone};

/// Max body chars forwarded to the model (token economy).
const BODY_PROMPT_LIMIT: usize = 1000;

/// Delegate backed by a local Ollama server.
pub struct OllamaDelegate {
    http: reqwest::Client,
    config: DelegateConfig,
    /// Category choices offered in the categorization prompt.
    categories: Vec<String>,
}

// ── Wire types ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    temperature: f32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaDelegate {
    /// Build a delegate from config. Fails only if the HTTP client itself
    /// cannot be constructed.
    pub fn new(config: DelegateConfig) -> Result<Self, DelegateError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DelegateError::unavailable(format!("http client: {e}")))?;

        let categories = Lexicon::default_categories()
            .category_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        Ok(Self {
            http,
            config,
            categories,
        })
    }

    /// Replace the category choices offered to the model. Pair this with the
    /// lexicon actually injected into the classifier.
    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    /// Construct and probe in one step: `None` when the server is
    /// unreachable, so callers naturally fall back to deterministic-only.
    pub async fn detect(config: DelegateConfig) -> Option<Self> {
        let delegate = Self::new(config).ok()?;
        if delegate.is_available().await {
            info!(
                base_url = %delegate.config.base_url,
                model = %delegate.config.model,
                "Local LLM delegate detected"
            );
            Some(delegate)
        } else {
            debug!(
                base_url = %delegate.config.base_url,
                "No local LLM delegate reachable"
            );
            None
        }
    }

    /// Probe the server: 2xx from `/api/tags` means usable.
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url());
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "Ollama availability probe failed");
                false
            }
        }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    /// One non-streaming generation round-trip.
    async fn generate(&self, prompt: &str, system: Option<&str>) -> Result<String, DelegateError> {
        let url = format!("{}/api/generate", self.base_url());
        let request = GenerateRequest {
            model: &self.config.model,
            prompt,
            system,
            temperature: self.config.temperature,
            stream: false,
        };

        debug!(model = %self.config.model, prompt_chars = prompt.len(), "Sending generation request");

        let response = self.http.post(&url).json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(DelegateError::unavailable(format!("HTTP {status} from {url}")));
        }

        let body: GenerateResponse = response.json().await?;
        Ok(body.response)
    }
}

#[async_trait]
impl LlmDelegate for OllamaDelegate {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn categorize_email(
        &self,
        subject: &str,
        body: &str,
        sender: &str,
    ) -> Result<Categorization, DelegateError> {
        let system = build_categorize_system_prompt(&self.categories);
        let prompt = build_email_prompt(subject, body, sender);

        let raw = self.generate(&prompt, Some(&system)).await?;
        let categorization = parse_categorization(&raw)?;

        debug!(
            category = %categorization.category,
            importance = categorization.importance,
            "Delegate categorized email"
        );
        Ok(categorization)
    }

    async fn draft_reply(
        &self,
        subject: &str,
        body: &str,
        sender: &str,
        category: &str,
        tone: Tone,
    ) -> Result<String, DelegateError> {
        let system = build_reply_system_prompt(tone, category);
        let prompt = build_email_prompt(subject, body, sender);

        let text = self.generate(&prompt, Some(&system)).await?;
        let text = text.trim();
        if text.is_empty() {
            return Err(DelegateError::malformed("empty reply generation"));
        }

        debug!(reply_chars = text.len(), "Delegate drafted reply");
        Ok(text.to_string())
    }
}

// ── Prompt construction ─────────────────────────────────────────────

/// System instruction for the categorization call.
fn build_categorize_system_prompt(categories: &[String]) -> String {
    let choices = categories.join(", ");
    format!(
        "You are an email triage engine. Categorize the email into exactly one of: \
         {choices}, Other.\n\
         Rate importance from 1 (ignore) to 10 (drop everything).\n\
         Summarize the email in one sentence.\n\n\
         Respond with ONLY a JSON object:\n\
         {{\"category\": \"...\", \"importance\": 5, \"summary\": \"...\"}}"
    )
}

/// System instruction for the reply call.
fn build_reply_system_prompt(tone: Tone, category: &str) -> String {
    format!(
        "You are an email assistant. Write a {tone} reply to the email below. \
         The email was categorized as {category}.\n\
         Keep the reply under 150 words, include a greeting and a closing line, \
         and do not invent facts, prices, or commitments."
    )
}

/// The email itself, as the user prompt for both call types.
fn build_email_prompt(subject: &str, body: &str, sender: &str) -> String {
    let body_preview: String = body.chars().take(BODY_PROMPT_LIMIT).collect();
    format!("From: {sender}\nSubject: {subject}\n\nBody:\n{body_preview}")
}
