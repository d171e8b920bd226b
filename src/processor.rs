//! End-to-end pipeline: categorize, label, and (when warranted) draft a
//! reply for each incoming email.

use chrono::Utc;
use tracing::info;

use crate::classifier::Classifier;
use crate::delegate::SharedDelegate;
use crate::labels::derive_labels;
use crate::lexicon::Lexicon;
use crate::responder::ResponseGenerator;
use crate::types::{EmailInput, ProcessedEmail};

/// Categories that never warrant a drafted reply.
const NO_REPLY_CATEGORIES: [&str; 4] = ["Spam", "Newsletter", "No_Longer_Works", "OOO"];

/// Categories that always warrant one, regardless of score.
const ALWAYS_REPLY_CATEGORIES: [&str; 4] = ["Meeting_Ready_Lead", "Power", "Question", "Urgent"];

/// Full triage pipeline over one classifier and one reply generator.
///
/// Processing is infallible: every email comes back with a categorization
/// and labels, and drafting only happens when [`should_respond`] says so.
pub struct EmailProcessor {
    classifier: Classifier,
    responder: ResponseGenerator,
}

impl EmailProcessor {
    /// Build a pipeline over `lexicon`. When a delegate is provided it is
    /// shared by both the classifier and the reply generator.
    pub fn new(lexicon: Lexicon, delegate: Option<SharedDelegate>) -> Self {
        let mut classifier = Classifier::new(lexicon);
        let mut responder = ResponseGenerator::new();
        if let Some(delegate) = delegate {
            classifier = classifier.with_delegate(delegate.clone());
            responder = responder.with_delegate(delegate);
        }
        Self {
            classifier,
            responder,
        }
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Run one email through the full pipeline.
    pub async fn process(&self, email: &EmailInput) -> ProcessedEmail {
        let categorization = self.classifier.categorize(email).await;
        let labels = derive_labels(&categorization);

        let response = if should_respond(&categorization.category, categorization.importance) {
            Some(self.responder.generate(email, &categorization).await)
        } else {
            None
        };

        info!(
            category = %categorization.category,
            importance = categorization.importance,
            drafted = response.is_some(),
            "Email processed"
        );

        ProcessedEmail {
            email: email.clone(),
            categorization,
            labels,
            response,
            processed_at: Utc::now(),
        }
    }

    /// Process a batch sequentially, preserving input order.
    pub async fn process_batch(&self, emails: &[EmailInput]) -> Vec<ProcessedEmail> {
        info!(count = emails.len(), "Processing email batch");
        let mut results = Vec::with_capacity(emails.len());
        for email in emails {
            results.push(self.process(email).await);
        }
        info!(count = results.len(), "Email batch complete");
        results
    }
}

impl Default for EmailProcessor {
    fn default() -> Self {
        Self::new(Lexicon::default_categories(), None)
    }
}

/// Reply gating policy.
///
/// Bulk and auto-reply traffic is filtered out first; after that, high
/// scores and high-touch categories always draft, and anything at or above
/// the baseline score still does.
pub fn should_respond(category: &str, importance: u8) -> bool {
    if NO_REPLY_CATEGORIES.contains(&category) {
        return false;
    }
    if importance >= 7 {
        return true;
    }
    if ALWAYS_REPLY_CATEGORIES.contains(&category) {
        return true;
    }
    importance >= 5
}
