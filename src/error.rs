//! Error types for mail-triage.
//!
//! Analysis itself is infallible: categorization, summaries and drafts always
//! produce a value. Errors only surface from lexicon construction and from
//! the optional LLM delegate, and delegate errors are recovered internally by
//! falling back to the deterministic tier.

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Lexicon error: {0}")]
    Lexicon(#[from] LexiconError),

    #[error("Delegate error: {0}")]
    Delegate(#[from] DelegateError),
}

/// Lexicon construction/validation errors.
#[derive(Debug, thiserror::Error)]
pub enum LexiconError {
    #[error("Category priority out of range for {category}: {priority} (expected 1-10)")]
    PriorityOutOfRange { category: String, priority: u8 },

    #[error("Duplicate category name: {0}")]
    DuplicateCategory(String),

    #[error("Category name is empty")]
    EmptyCategoryName,

    #[error("Category {0} has no terms")]
    EmptyTermList(String),

    #[error("Category name {0} is reserved")]
    ReservedCategoryName(String),
}

/// LLM delegate errors. Both variants are recoverable: callers log them and
/// continue with the deterministic path.
#[derive(Debug, thiserror::Error)]
pub enum DelegateError {
    #[error("Delegate unreachable: {reason}")]
    Unavailable { reason: String },

    #[error("Delegate returned malformed output: {reason}")]
    Malformed { reason: String },
}

impl DelegateError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for DelegateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Unavailable {
                reason: format!("request timed out: {err}"),
            }
        } else if err.is_decode() {
            Self::Malformed {
                reason: format!("response body: {err}"),
            }
        } else {
            Self::Unavailable {
                reason: err.to_string(),
            }
        }
    }
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
