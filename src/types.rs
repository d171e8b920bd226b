//! Shared types for the email triage pipeline.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Email input ─────────────────────────────────────────────────────

/// A single email as handed to the engine.
///
/// Callers own fetching/parsing; the engine only sees these three fields.
/// Absent fields are represented as empty strings and are always safe.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmailInput {
    /// Subject line ("" when missing).
    pub subject: String,
    /// Plain-text body ("" when missing). See `content::html_to_text`
    /// for preparing HTML bodies.
    pub body: String,
    /// Raw sender header, e.g. `Alice Smith <alice@example.com>`.
    pub sender: String,
}

impl EmailInput {
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            body: body.into(),
            sender: sender.into(),
        }
    }

    /// Lowercased `subject + " " + body`, the text every keyword rule
    /// matches against.
    pub fn match_text(&self) -> String {
        format!("{} {}", self.subject, self.body).to_lowercase()
    }
}

// ── Categorization ──────────────────────────────────────────────────

/// Reserved category for emails no lexicon entry matches.
pub const CATEGORY_OTHER: &str = "Other";

/// Classification result for one email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categorization {
    /// Winning lexicon category name, or `"Other"`.
    pub category: String,
    /// Importance score, always an integer in 1..=10.
    pub importance: u8,
    /// Short excerpt-based summary of the body.
    pub summary: String,
}

impl Categorization {
    pub fn other(summary: impl Into<String>) -> Self {
        Self {
            category: CATEGORY_OTHER.to_string(),
            importance: 5,
            summary: summary.into(),
        }
    }
}

// ── Tone ────────────────────────────────────────────────────────────

/// Voice of a drafted reply, derived from category and importance.
///
/// Drives the greeting, the closing line, and the delegate's system
/// instruction. Closed set on purpose: downstream formatting matches on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Professional,
    Friendly,
    Concise,
}

impl Tone {
    /// Closing line for this tone. Every deterministic draft ends with one.
    pub fn closing(&self) -> &'static str {
        match self {
            Self::Professional => "Best regards",
            Self::Friendly => "Best wishes",
            Self::Concise => "Regards",
        }
    }

    /// Greeting prefix for this tone.
    pub fn greeting(&self, name: &str) -> String {
        match self {
            Self::Professional => format!("Hello {name},"),
            Self::Friendly | Self::Concise => format!("Hi {name},"),
        }
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Professional => "professional",
            Self::Friendly => "friendly",
            Self::Concise => "concise",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Tone {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "professional" => Ok(Self::Professional),
            "friendly" => Ok(Self::Friendly),
            "concise" => Ok(Self::Concise),
            _ => Err(format!("unknown tone: {s}")),
        }
    }
}

// ── Intent ──────────────────────────────────────────────────────────

/// What the reply is trying to do, detected from the email content.
///
/// Detection is first-match in declaration order; `Acknowledge` is the
/// catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    AnswerQuestion,
    ScheduleMeeting,
    ProvideUpdate,
    UrgentResponse,
    Acknowledge,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AnswerQuestion => "answer_question",
            Self::ScheduleMeeting => "schedule_meeting",
            Self::ProvideUpdate => "provide_update",
            Self::UrgentResponse => "urgent_response",
            Self::Acknowledge => "acknowledge",
        };
        write!(f, "{s}")
    }
}

impl FromStr for Intent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "answer_question" => Ok(Self::AnswerQuestion),
            "schedule_meeting" => Ok(Self::ScheduleMeeting),
            "provide_update" => Ok(Self::ProvideUpdate),
            "urgent_response" => Ok(Self::UrgentResponse),
            "acknowledge" => Ok(Self::Acknowledge),
            _ => Err(format!("unknown intent: {s}")),
        }
    }
}

// ── Response draft ──────────────────────────────────────────────────

/// A drafted reply, never sent automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseDraft {
    /// Reply subject, `Re:`-prefixed unless the original already was.
    pub subject: String,
    /// Full reply text: greeting, content, closing. Never empty.
    pub body: String,
    pub tone: Tone,
    pub intent: Intent,
    /// True when a human should approve before sending.
    pub hold_for_review: bool,
    /// Follow-up actions suggested to the operator.
    pub suggested_actions: Vec<String>,
}

// ── Processed email ─────────────────────────────────────────────────

/// Result of running one email through the full pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedEmail {
    /// The original input.
    pub email: EmailInput,
    /// Classification outcome.
    pub categorization: Categorization,
    /// Labels derived from the categorization.
    pub labels: Vec<String>,
    /// Drafted reply, when the gating policy asked for one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ResponseDraft>,
    /// When processing completed.
    pub processed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_text_joins_and_lowercases() {
        let email = EmailInput::new("Quick Question", "Can we TALK?", "a@x.com");
        assert_eq!(email.match_text(), "quick question can we talk?");
    }

    #[test]
    fn match_text_handles_empty_fields() {
        let email = EmailInput::default();
        assert_eq!(email.match_text(), " ");
    }

    #[test]
    fn tone_display_fromstr_roundtrip() {
        for tone in [Tone::Professional, Tone::Friendly, Tone::Concise] {
            let parsed: Tone = tone.to_string().parse().unwrap();
            assert_eq!(parsed, tone);
        }
        assert!("shouty".parse::<Tone>().is_err());
    }

    #[test]
    fn intent_display_fromstr_roundtrip() {
        for intent in [
            Intent::AnswerQuestion,
            Intent::ScheduleMeeting,
            Intent::ProvideUpdate,
            Intent::UrgentResponse,
            Intent::Acknowledge,
        ] {
            let parsed: Intent = intent.to_string().parse().unwrap();
            assert_eq!(parsed, intent);
        }
        assert!("rant".parse::<Intent>().is_err());
    }

    #[test]
    fn tone_serializes_snake_case() {
        let json = serde_json::to_value(Tone::Professional).unwrap();
        assert_eq!(json, "professional");
    }

    #[test]
    fn every_tone_has_a_closing() {
        for tone in [Tone::Professional, Tone::Friendly, Tone::Concise] {
            assert!(!tone.closing().is_empty());
        }
    }

    #[test]
    fn draft_serialization_shape() {
        let draft = ResponseDraft {
            subject: "Re: Pricing".into(),
            body: "Hello Alice,\n\nDetails attached.\n\nBest regards".into(),
            tone: Tone::Professional,
            intent: Intent::AnswerQuestion,
            hold_for_review: true,
            suggested_actions: vec!["Provide detailed answer".into()],
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["tone"], "professional");
        assert_eq!(json["intent"], "answer_question");
        assert_eq!(json["hold_for_review"], true);
        assert!(json["suggested_actions"].is_array());
    }

    #[test]
    fn processed_email_omits_absent_response() {
        let processed = ProcessedEmail {
            email: EmailInput::new("s", "b", "x@y.com"),
            categorization: Categorization::other(""),
            labels: vec!["Category_Other".into()],
            response: None,
            processed_at: Utc::now(),
        };
        let json = serde_json::to_value(&processed).unwrap();
        assert!(json.get("response").is_none());
    }

    #[test]
    fn categorization_other_defaults_to_baseline() {
        let cat = Categorization::other("hi");
        assert_eq!(cat.category, "Other");
        assert_eq!(cat.importance, 5);
        assert_eq!(cat.summary, "hi");
    }
}
