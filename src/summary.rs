//! Deterministic body summarizer.
//!
//! No model involved: short bodies pass through verbatim, long ones are
//! excerpted. The rule is fixed so the same body always yields the same
//! summary.

/// Bodies at or under this many chars are returned unchanged.
const VERBATIM_LIMIT: usize = 250;

/// Summarize an email body.
///
/// - ≤ 250 chars: returned verbatim.
/// - Longer, with more than two sentences: `"{first}... {last}"` when that
///   excerpt itself fits under 250 chars.
/// - Otherwise: first 250 chars + `"..."`.
///
/// Operates on char boundaries, so multi-byte text never panics.
pub fn summarize(body: &str) -> String {
    if body.chars().count() <= VERBATIM_LIMIT {
        return body.to_string();
    }

    let sentences: Vec<&str> = body
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    if sentences.len() > 2 {
        // First and last sentence carry the opening ask and the final call
        // to action; the middle is usually filler.
        let first = sentences[0];
        let last = sentences[sentences.len() - 1];
        let excerpt = format!("{first}... {last}");
        if excerpt.chars().count() < VERBATIM_LIMIT {
            return excerpt;
        }
    }

    let head: String = body.chars().take(VERBATIM_LIMIT).collect();
    format!("{head}...")
}
