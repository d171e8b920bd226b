//! Categorization and importance scoring.
//!
//! Two tiers:
//! 1. Delegate (optional): a local LLM categorizes first when configured.
//! 2. Rule-based: lexicon term scoring, always available and fully
//!    deterministic.
//!
//! Any delegate failure falls through to tier 2, so `categorize` never
//! fails and an absent delegate is indistinguishable from a broken one.

use tracing::{debug, warn};

use crate::delegate::SharedDelegate;
use crate::lexicon::{CategoryEntry, ImportanceKeywords, Lexicon};
use crate::summary::summarize;
use crate::types::{CATEGORY_OTHER, Categorization, EmailInput};

/// Importance starts here before any keyword adjustment.
const BASELINE_IMPORTANCE: f64 = 5.0;

/// Added per matched urgent keyword.
const URGENT_WEIGHT: f64 = 1.5;

/// Added per matched high-value keyword.
const HIGH_VALUE_WEIGHT: f64 = 1.0;

/// Subtracted per matched low-priority keyword.
const LOW_PRIORITY_WEIGHT: f64 = 1.0;

/// Email classifier over an injected lexicon.
pub struct Classifier {
    lexicon: Lexicon,
    keywords: ImportanceKeywords,
    delegate: Option<SharedDelegate>,
}

impl Classifier {
    /// Classifier with the given lexicon, default importance keywords, and
    /// no delegate.
    pub fn new(lexicon: Lexicon) -> Self {
        Self {
            lexicon,
            keywords: ImportanceKeywords::default(),
            delegate: None,
        }
    }

    pub fn with_keywords(mut self, keywords: ImportanceKeywords) -> Self {
        self.keywords = keywords;
        self
    }

    pub fn with_delegate(mut self, delegate: SharedDelegate) -> Self {
        self.delegate = Some(delegate);
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Categorize one email. Never fails: delegate errors are logged and the
    /// rule-based tier answers instead.
    pub async fn categorize(&self, email: &EmailInput) -> Categorization {
        if let Some(delegate) = &self.delegate {
            match delegate
                .categorize_email(&email.subject, &email.body, &email.sender)
                .await
            {
                Ok(mut categorization) => {
                    // Importance stays in 1..=10 and the category is never
                    // blank, whatever the delegate returned.
                    categorization.importance = categorization.importance.clamp(1, 10);
                    if categorization.category.trim().is_empty() {
                        categorization.category = CATEGORY_OTHER.to_string();
                    }
                    debug!(
                        delegate = delegate.name(),
                        category = %categorization.category,
                        importance = categorization.importance,
                        "Delegate categorization accepted"
                    );
                    return categorization;
                }
                Err(e) => {
                    warn!(
                        delegate = delegate.name(),
                        error = %e,
                        "Delegate categorization failed, using rule-based tier"
                    );
                }
            }
        }

        self.rule_based(email)
    }

    /// Deterministic tier: a pure function of lexicon, keyword sets, and
    /// input text. Same input, same output, every time.
    pub fn rule_based(&self, email: &EmailInput) -> Categorization {
        let text = email.match_text();
        let winner = self.best_entry(&text);
        let importance = self.importance(&text, winner);

        let category = winner
            .map(|e| e.name.clone())
            .unwrap_or_else(|| CATEGORY_OTHER.to_string());

        debug!(category = %category, importance, "Rule-based categorization");

        Categorization {
            category,
            importance,
            summary: summarize(&email.body),
        }
    }

    /// Highest-scoring entry, or `None` when nothing matches.
    ///
    /// Score is matched-term-count × priority. Strictly-greater comparison
    /// in declaration order means the earliest entry keeps a tie.
    fn best_entry(&self, text: &str) -> Option<&CategoryEntry> {
        let mut best: Option<(&CategoryEntry, usize)> = None;
        for entry in self.lexicon.entries() {
            let score = entry.match_count(text) * entry.priority as usize;
            if score > 0 && best.is_none_or(|(_, s)| score > s) {
                best = Some((entry, score));
            }
        }
        best.map(|(entry, _)| entry)
    }

    /// Importance formula: baseline 5, keyword weights, then a category
    /// adjustment of `(priority - 5) / 2`. Round, then clamp to 1..=10.
    fn importance(&self, text: &str, winner: Option<&CategoryEntry>) -> u8 {
        let urgent = count_contained(&self.keywords.urgent, text) as f64;
        let high_value = count_contained(&self.keywords.high_value, text) as f64;
        let low_priority = count_contained(&self.keywords.low_priority, text) as f64;

        let mut score = BASELINE_IMPORTANCE + urgent * URGENT_WEIGHT
            + high_value * HIGH_VALUE_WEIGHT
            - low_priority * LOW_PRIORITY_WEIGHT;

        if let Some(entry) = winner {
            score += (entry.priority as f64 - BASELINE_IMPORTANCE) / 2.0;
        }

        score.round().clamp(1.0, 10.0) as u8
    }
}

/// Presence count: how many of `terms` the text contains at least once.
fn count_contained(terms: &[String], text: &str) -> usize {
    terms.iter().filter(|t| text.contains(t.as_str())).count()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::delegate::LlmDelegate;
    use crate::error::DelegateError;
    use crate::types::Tone;

    fn classifier() -> Classifier {
        Classifier::new(Lexicon::default_categories())
    }

    // ── Rule-based categorization ───────────────────────────────────

    #[test]
    fn empty_input_is_other_at_baseline() {
        let result = classifier().rule_based(&EmailInput::default());
        assert_eq!(result.category, "Other");
        assert_eq!(result.importance, 5);
        assert_eq!(result.summary, "");
    }

    #[test]
    fn unmatched_text_is_other_at_baseline() {
        let email = EmailInput::new("Lunch", "Pizza at noon near the park", "a@x.com");
        let result = classifier().rule_based(&email);
        assert_eq!(result.category, "Other");
        assert_eq!(result.importance, 5);
    }

    #[test]
    fn meeting_terms_select_meeting_category() {
        let email = EmailInput::new(
            "Intro call",
            "Can we schedule a meeting to discuss next steps?",
            "lead@corp.com",
        );
        let result = classifier().rule_based(&email);
        assert_eq!(result.category, "Meeting_Ready_Lead");
        // Baseline 5 + category adjustment (8-5)/2 = 6.5, rounds to 7.
        assert_eq!(result.importance, 7);
    }

    #[test]
    fn scoring_is_match_count_times_priority() {
        // One Power term (budget, 1 x 9) vs four Question terms (4 x 5 = 20).
        let email = EmailInput::new(
            "question",
            "can you explain what is included? budget is tight",
            "x@y.com",
        );
        let result = classifier().rule_based(&email);
        assert_eq!(result.category, "Question");
    }

    #[test]
    fn tie_keeps_first_declared_entry() {
        let lexicon = Lexicon::try_new(vec![
            CategoryEntry::new("First", &["alpha"], 5),
            CategoryEntry::new("Second", &["beta"], 5),
        ])
        .unwrap();
        let classifier = Classifier::new(lexicon);
        let email = EmailInput::new("", "alpha beta", "a@x.com");
        assert_eq!(classifier.rule_based(&email).category, "First");
    }

    #[test]
    fn higher_score_beats_earlier_declaration() {
        let lexicon = Lexicon::try_new(vec![
            CategoryEntry::new("First", &["alpha"], 5),
            CategoryEntry::new("Second", &["beta", "gamma"], 5),
        ])
        .unwrap();
        let classifier = Classifier::new(lexicon);
        let email = EmailInput::new("", "alpha beta gamma", "a@x.com");
        assert_eq!(classifier.rule_based(&email).category, "Second");
    }

    #[test]
    fn presence_counts_once_per_term() {
        let once = EmailInput::new("", "urgent request", "a@x.com");
        let thrice = EmailInput::new("", "urgent urgent urgent request", "a@x.com");
        let c = classifier();
        assert_eq!(
            c.rule_based(&once).importance,
            c.rule_based(&thrice).importance
        );
    }

    #[test]
    fn urgent_contract_email_maxes_importance() {
        let email = EmailInput::new(
            "Urgent: contract deadline",
            "We need to sign the partnership contract by Friday, asap",
            "cfo@client.com",
        );
        let result = classifier().rule_based(&email);
        // urgent/asap/deadline (+1.5 each) plus partnership/contract/sign/deal
        // (+1 each) blow past the cap.
        assert_eq!(result.importance, 10);
        assert!(result.importance >= 8);
    }

    #[test]
    fn urgent_category_wins_when_lexicon_carries_one() {
        let lexicon = Lexicon::try_new(vec![CategoryEntry::new(
            "Urgent_Deal",
            &["urgent", "contract", "partnership"],
            9,
        )])
        .unwrap();
        let classifier = Classifier::new(lexicon);
        let email = EmailInput::new(
            "Urgent: contract deadline",
            "We need to sign the partnership contract by Friday, asap",
            "cfo@client.com",
        );
        let result = classifier.rule_based(&email);
        assert_eq!(result.category, "Urgent_Deal");
        assert_eq!(result.importance, 10);
    }

    #[test]
    fn newsletter_email_lands_low() {
        let email = EmailInput::new(
            "Newsletter – Monthly Update",
            "Just our monthly roundup, nothing urgent",
            "news@vendor.com",
        );
        let result = classifier().rule_based(&email);
        assert_eq!(result.category, "Newsletter");
        // 5 + 1.5 (urgent) - 2 (newsletter, update) - 1.5 (priority 2) = 3.
        assert_eq!(result.importance, 3);
        assert!((1..=3).contains(&result.importance));
    }

    #[test]
    fn importance_clamps_at_floor() {
        let email = EmailInput::new(
            "Newsletter",
            "newsletter subscription update notification fyi marketing announcement promotion offer",
            "noreply@spam.com",
        );
        let result = classifier().rule_based(&email);
        assert_eq!(result.importance, 1);
    }

    #[test]
    fn importance_is_always_in_range() {
        let samples = [
            ("", ""),
            ("urgent asap critical emergency", "deadline important priority time-sensitive"),
            ("newsletter", "fyi marketing promotion offer update notification"),
            ("Meeting?", "schedule a call to discuss the contract opportunity"),
        ];
        let c = classifier();
        for (subject, body) in samples {
            let result = c.rule_based(&EmailInput::new(subject, body, "a@x.com"));
            assert!(
                (1..=10).contains(&result.importance),
                "importance {} out of range for {subject:?}",
                result.importance
            );
        }
    }

    #[test]
    fn custom_keyword_sets_drive_importance() {
        let keywords = ImportanceKeywords {
            urgent: vec!["red alert".into()],
            high_value: Vec::new(),
            low_priority: Vec::new(),
        };
        let email = EmailInput::new("Red alert", "all hands on deck", "ops@x.com");

        let custom = Classifier::new(Lexicon::empty()).with_keywords(keywords);
        // 5 + 1.5, no category adjustment, rounds to 7.
        assert_eq!(custom.rule_based(&email).importance, 7);

        let silent = Classifier::new(Lexicon::empty()).with_keywords(ImportanceKeywords::empty());
        assert_eq!(silent.rule_based(&email).importance, 5);
    }

    #[test]
    fn rule_based_is_deterministic() {
        let email = EmailInput::new(
            "Pricing question",
            "I'm interested in pricing for the enterprise tier. Can you share a quote?",
            "buyer@corp.com",
        );
        let c = classifier();
        assert_eq!(c.rule_based(&email), c.rule_based(&email));
    }

    #[test]
    fn long_bodies_get_excerpt_summaries() {
        let body = format!("Opening ask. {} Final call to action.", "Mid. ".repeat(80));
        let email = EmailInput::new("Long one", &body, "a@x.com");
        let result = classifier().rule_based(&email);
        assert_ne!(result.summary, body);
        assert!(!result.summary.is_empty());
    }

    #[test]
    fn empty_lexicon_always_answers_other() {
        let classifier = Classifier::new(Lexicon::empty());
        let email = EmailInput::new("Meeting", "schedule a call", "a@x.com");
        assert_eq!(classifier.rule_based(&email).category, "Other");
    }

    // ── Delegate dispatch ───────────────────────────────────────────

    struct FixedDelegate {
        categorization: Categorization,
    }

    #[async_trait]
    impl LlmDelegate for FixedDelegate {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn categorize_email(
            &self,
            _subject: &str,
            _body: &str,
            _sender: &str,
        ) -> Result<Categorization, DelegateError> {
            Ok(self.categorization.clone())
        }

        async fn draft_reply(
            &self,
            _subject: &str,
            _body: &str,
            _sender: &str,
            _category: &str,
            _tone: Tone,
        ) -> Result<String, DelegateError> {
            Ok("canned".into())
        }
    }

    struct FailingDelegate;

    #[async_trait]
    impl LlmDelegate for FailingDelegate {
        fn name(&self) -> &str {
            "failing"
        }

        async fn categorize_email(
            &self,
            _subject: &str,
            _body: &str,
            _sender: &str,
        ) -> Result<Categorization, DelegateError> {
            Err(DelegateError::unavailable("connection refused"))
        }

        async fn draft_reply(
            &self,
            _subject: &str,
            _body: &str,
            _sender: &str,
            _category: &str,
            _tone: Tone,
        ) -> Result<String, DelegateError> {
            Err(DelegateError::unavailable("connection refused"))
        }
    }

    #[tokio::test]
    async fn delegate_result_is_preferred() {
        let delegate = Arc::new(FixedDelegate {
            categorization: Categorization {
                category: "Interested".into(),
                importance: 8,
                summary: "Model summary".into(),
            },
        });
        let classifier = classifier().with_delegate(delegate);
        let email = EmailInput::new("Anything", "at all", "a@x.com");
        let result = classifier.categorize(&email).await;
        assert_eq!(result.category, "Interested");
        assert_eq!(result.importance, 8);
        assert_eq!(result.summary, "Model summary");
    }

    #[tokio::test]
    async fn out_of_contract_delegate_values_are_normalized() {
        let delegate = Arc::new(FixedDelegate {
            categorization: Categorization {
                category: "   ".into(),
                importance: 0,
                summary: "odd".into(),
            },
        });
        let classifier = classifier().with_delegate(delegate);
        let email = EmailInput::new("Hi", "there", "a@x.com");
        let result = classifier.categorize(&email).await;
        assert_eq!(result.category, "Other");
        assert_eq!(result.importance, 1);
    }

    #[tokio::test]
    async fn failing_delegate_matches_no_delegate() {
        let email = EmailInput::new(
            "Question about the demo",
            "Can you explain how the trial works?",
            "lead@corp.com",
        );
        let plain = classifier().categorize(&email).await;
        let with_failing = classifier()
            .with_delegate(Arc::new(FailingDelegate))
            .categorize(&email)
            .await;
        assert_eq!(plain, with_failing);
    }

    #[tokio::test]
    async fn no_delegate_uses_rule_based_tier() {
        let email = EmailInput::new("Meeting", "Let's schedule a call", "a@x.com");
        let c = classifier();
        let via_categorize = c.categorize(&email).await;
        let via_rule_based = c.rule_based(&email);
        assert_eq!(via_categorize, via_rule_based);
    }
}
