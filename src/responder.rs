//! Reply drafting.
//!
//! Drafts are never sent by this crate; they are handed back for human
//! review. Tone, intent, subject, hold-for-review, and suggested actions are
//! always computed locally. Only the body text may come from the delegate,
//! and any delegate failure (or empty generation) falls back to the
//! deterministic fragment synthesis.

use tracing::{debug, warn};

use crate::content::display_name;
use crate::delegate::SharedDelegate;
use crate::types::{Categorization, EmailInput, Intent, ResponseDraft, Tone};

/// Reply generator with an optional LLM delegate.
pub struct ResponseGenerator {
    delegate: Option<SharedDelegate>,
}

impl ResponseGenerator {
    pub fn new() -> Self {
        Self { delegate: None }
    }

    pub fn with_delegate(mut self, delegate: SharedDelegate) -> Self {
        self.delegate = Some(delegate);
        self
    }

    /// Draft a reply for a categorized email. Never fails, never returns an
    /// empty body.
    pub async fn generate(
        &self,
        email: &EmailInput,
        categorization: &Categorization,
    ) -> ResponseDraft {
        let tone = determine_tone(&categorization.category, categorization.importance);
        let intent = detect_intent(&email.match_text());

        let body = match &self.delegate {
            Some(delegate) => {
                match delegate
                    .draft_reply(
                        &email.subject,
                        &email.body,
                        &email.sender,
                        &categorization.category,
                        tone,
                    )
                    .await
                {
                    Ok(text) if !text.trim().is_empty() => {
                        debug!(delegate = delegate.name(), "Delegate reply accepted");
                        text
                    }
                    Ok(_) => {
                        warn!(
                            delegate = delegate.name(),
                            "Delegate returned empty reply, synthesizing"
                        );
                        synthesize_body(email, intent, tone)
                    }
                    Err(e) => {
                        warn!(
                            delegate = delegate.name(),
                            error = %e,
                            "Delegate reply failed, synthesizing"
                        );
                        synthesize_body(email, intent, tone)
                    }
                }
            }
            None => synthesize_body(email, intent, tone),
        };

        ResponseDraft {
            subject: reply_subject(&email.subject),
            body,
            tone,
            intent,
            hold_for_review: hold_for_review(&categorization.category, categorization.importance),
            suggested_actions: suggested_actions(
                &categorization.category,
                categorization.importance,
            ),
        }
    }
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// ── Tone and intent ─────────────────────────────────────────────────

/// Voice for the reply: leads and power contacts (or anything scored 8+)
/// get the formal register, warm categories get the friendly one, the rest
/// stay short.
pub fn determine_tone(category: &str, importance: u8) -> Tone {
    if matches!(category, "Meeting_Ready_Lead" | "Power") || importance >= 8 {
        Tone::Professional
    } else if matches!(category, "Interested" | "Question") {
        Tone::Friendly
    } else {
        Tone::Concise
    }
}

/// First-match intent detection over the lowercased subject+body.
pub fn detect_intent(text: &str) -> Intent {
    if text.contains('?') {
        Intent::AnswerQuestion
    } else if text.contains("meet") || text.contains("schedule") {
        Intent::ScheduleMeeting
    } else if text.contains("update") || text.contains("status") {
        Intent::ProvideUpdate
    } else if text.contains("urgent") || text.contains("asap") {
        Intent::UrgentResponse
    } else {
        Intent::Acknowledge
    }
}

// ── Deterministic body synthesis ────────────────────────────────────

/// Greeting, intent-specific content, closing.
fn synthesize_body(email: &EmailInput, intent: Intent, tone: Tone) -> String {
    let greeting = tone.greeting(&display_name(&email.sender));
    let content = intent_fragment(intent, &email.match_text());
    let closing = tone.closing();
    format!("{greeting}\n\n{content}\n\n{closing}")
}

/// Core reply content per intent, with sub-branches on secondary keywords.
fn intent_fragment(intent: Intent, text: &str) -> &'static str {
    match intent {
        Intent::AnswerQuestion => {
            if text.contains("pricing") || text.contains("cost") {
                "Thank you for your question about pricing. I'll put together the \
                 details and send them over shortly."
            } else if text.contains("feature") || text.contains("product") {
                "Thank you for your question about the product. I'd be happy to walk \
                 you through the capabilities that matter for your use case."
            } else if text.contains("when") || text.contains("timeline") {
                "Thank you for your question about timing. I'll confirm the timeline \
                 and get back to you with specifics."
            } else {
                "Thank you for your question. I'll look into it and get back to you \
                 with a complete answer."
            }
        }
        Intent::ScheduleMeeting => {
            if text.contains("next week") {
                "I'd be glad to meet next week. Could you share a couple of times \
                 that work for you?"
            } else if text.contains("tomorrow") || text.contains("today") {
                "I can make time on short notice. Let me know which slot works and \
                 I'll confirm right away."
            } else {
                "I'd be happy to schedule a meeting. Could you share your \
                 availability and I'll send over an invite?"
            }
        }
        Intent::ProvideUpdate => {
            "Thanks for checking in. Things are on track on my side, and I'll follow \
             up with a fuller status shortly."
        }
        Intent::UrgentResponse => {
            if text.contains("issue") || text.contains("problem") {
                "I understand this is urgent. I'm looking into the issue right now \
                 and will update you as soon as I know more."
            } else {
                "I understand the urgency. This is at the top of my list and I'll \
                 respond fully as soon as possible."
            }
        }
        Intent::Acknowledge => {
            "Thank you for your email. I've received it and will get back to you \
             soon."
        }
    }
}

/// `Re:`-prefix the subject unless it already is (case-insensitive).
fn reply_subject(subject: &str) -> String {
    let trimmed = subject.trim();
    if trimmed.is_empty() {
        "Re: your email".to_string()
    } else if trimmed.to_lowercase().starts_with("re:") {
        trimmed.to_string()
    } else {
        format!("Re: {trimmed}")
    }
}

// ── Review gating and actions ───────────────────────────────────────

/// Union rule for human review. The importance >= 8 branch is subsumed by
/// the final one but kept explicit: high scores hold no matter how the
/// thresholds move.
pub fn hold_for_review(category: &str, importance: u8) -> bool {
    if importance >= 8 {
        return true;
    }
    if matches!(category, "Power" | "Meeting_Ready_Lead" | "Obstacle") {
        return true;
    }
    importance >= 5
}

/// Operator follow-ups per category, with importance-gated extras.
pub fn suggested_actions(category: &str, importance: u8) -> Vec<String> {
    let mut actions: Vec<&str> = Vec::new();
    match category {
        "Meeting_Ready_Lead" => {
            actions.push("Schedule meeting");
            actions.push("Send calendar invite");
            if importance >= 8 {
                actions.push("Prepare meeting agenda");
            }
        }
        "Power" => {
            actions.push("Research company");
            actions.push("Prepare personalized proposal");
            if importance >= 8 {
                actions.push("Alert sales manager");
            }
        }
        "Interested" => {
            actions.push("Send product information");
            actions.push("Follow up in 3 days");
        }
        "Question" => {
            actions.push("Provide detailed answer");
            if importance >= 7 {
                actions.push("Schedule call for complex questions");
            }
        }
        "Obstacle" => {
            actions.push("Escalate to support team");
            actions.push("Follow up after resolution");
        }
        "Not_Interested" => {
            actions.push("Update CRM status");
            actions.push("Schedule follow-up in 3 months");
        }
        _ => {
            actions.push("Review and respond");
            if importance >= 7 {
                actions.push("Prioritize response");
            }
        }
    }
    actions.into_iter().map(String::from).collect()
}
