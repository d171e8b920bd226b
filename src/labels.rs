//! Label derivation: categorization in, mailbox label names out.
//!
//! Callers own applying these to their mail store; this module only decides
//! what the labels are. Names are normalized to `[A-Za-z0-9_-]` so they are
//! safe as folder/label identifiers everywhere.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Categorization;

static LABEL_FORBIDDEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w-]").expect("valid regex"));
static LABEL_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Derive the full label set for a categorization.
///
/// Always one `Category_*` label and one `Priority_*` label; categories that
/// imply a follow-up action get extra context labels.
pub fn derive_labels(categorization: &Categorization) -> Vec<String> {
    let mut labels = vec![format!("Category_{}", categorization.category)];

    labels.push(
        match categorization.importance {
            8.. => "Priority_High",
            5..=7 => "Priority_Medium",
            _ => "Priority_Low",
        }
        .to_string(),
    );

    for label in context_labels(&categorization.category) {
        labels.push((*label).to_string());
    }

    labels.iter().map(|l| normalize_label(l)).collect()
}

/// Extra labels implied by the category itself.
fn context_labels(category: &str) -> &'static [&'static str] {
    match category {
        "Meeting_Ready_Lead" => &["Action_Schedule"],
        "Power" => &["Action_Follow_Up", "VIP"],
        "Interested" => &["Action_Follow_Up"],
        "Question" => &["Action_Reply"],
        "Obstacle" => &["Action_Resolve"],
        "OOO" => &["Auto_Reply"],
        "Spam" => &["Junk"],
        _ => &[],
    }
}

/// Normalize a raw label: whitespace runs become `_`, anything outside
/// `[\w-]` is dropped.
pub fn normalize_label(raw: &str) -> String {
    let underscored = LABEL_WHITESPACE.replace_all(raw.trim(), "_");
    LABEL_FORBIDDEN.replace_all(&underscored, "").to_string()
}
