//! LLM delegate capability.
//!
//! The delegate is strictly optional: analysis holds an
//! `Option<Arc<dyn LlmDelegate>>` and treats an absent delegate and a failing
//! delegate identically. Implementations must bound every call with a timeout;
//! the engine never retries; any error sends the caller straight to the
//! deterministic tier.

pub mod ollama;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::DelegateError;
use crate::types::{CATEGORY_OTHER, Categorization, Tone};

pub use ollama::OllamaDelegate;

/// Summary used when the delegate answers without one.
const MISSING_SUMMARY: &str = "No summary available";

/// A language-model backend the engine may consult before its rule-based
/// tier.
#[async_trait]
pub trait LlmDelegate: Send + Sync {
    /// Implementation name for logging.
    fn name(&self) -> &str;

    /// Categorize one email. The result is already normalized: importance
    /// clamped to 1..=10, category defaulted to `"Other"` when absent.
    async fn categorize_email(
        &self,
        subject: &str,
        body: &str,
        sender: &str,
    ) -> Result<Categorization, DelegateError>;

    /// Draft a reply body in the given tone for an email already categorized.
    /// Returns the full reply text (greeting through closing).
    async fn draft_reply(
        &self,
        subject: &str,
        body: &str,
        sender: &str,
        category: &str,
        tone: Tone,
    ) -> Result<String, DelegateError>;
}

/// Shared handle type consumers store.
pub type SharedDelegate = Arc<dyn LlmDelegate>;

// ── Response parsing ────────────────────────────────────────────────

/// Raw categorization JSON as models actually emit it: every field may be
/// missing, importance may be fractional.
#[derive(Debug, Deserialize)]
struct RawCategorization {
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    importance: Option<f64>,
    #[serde(default)]
    summary: Option<String>,
}

/// Parse a model's categorization output into a normalized `Categorization`.
///
/// Tolerates markdown fencing and surrounding prose; anything that still
/// fails to parse as a JSON object is a `Malformed` error, which callers
/// treat as "run the deterministic path instead". No partial salvage.
pub fn parse_categorization(raw: &str) -> Result<Categorization, DelegateError> {
    let json_str = extract_json_object(raw);
    let parsed: RawCategorization = serde_json::from_str(&json_str)
        .map_err(|e| DelegateError::malformed(format!("JSON parse error: {e}")))?;

    let category = match parsed.category {
        Some(c) if !c.trim().is_empty() => c.trim().to_string(),
        _ => CATEGORY_OTHER.to_string(),
    };

    let importance = parsed
        .importance
        .filter(|i| i.is_finite())
        .unwrap_or(5.0)
        .round()
        .clamp(1.0, 10.0) as u8;

    let summary = match parsed.summary {
        Some(s) if !s.trim().is_empty() => s,
        _ => MISSING_SUMMARY.to_string(),
    };

    Ok(Categorization {
        category,
        importance,
        summary,
    })
}

/// Pull a JSON object out of model output (handles markdown wrapping).
fn extract_json_object(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.starts_with('{') {
        return trimmed.to_string();
    }

    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim().to_string();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if inner.starts_with('{') {
                return inner.to_string();
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && end > start
    {
        return trimmed[start..=end].to_string();
    }

    trimmed.to_string()
}
