//! Content preparation helpers: sender display names, HTML body cleanup.
//!
//! The engine itself only consumes plain text; these helpers are for callers
//! turning raw headers/HTML payloads into `EmailInput` fields. Pure string
//! processing, no LLM calls.

use std::sync::LazyLock;

use regex::Regex;

static STYLE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<style[^>]*>.*?</style>").expect("valid regex"));
static SCRIPT_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<script[^>]*>.*?</script>").expect("valid regex"));
static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Extract a greeting-ready display name from a raw From header.
///
/// - `Alice Smith <alice@example.com>` → `Alice Smith`
/// - `alice@example.com` → `alice`
/// - empty or name-less (`<a@x.com>`) → `there` (so greetings still read
///   naturally)
pub fn display_name(sender: &str) -> String {
    let name = if let Some(idx) = sender.find('<') {
        sender[..idx].trim().trim_matches('"').trim()
    } else {
        sender.split('@').next().unwrap_or("").trim()
    };

    if name.is_empty() {
        "there".to_string()
    } else {
        name.to_string()
    }
}

/// Convert an HTML email body to plain text.
///
/// Drops `<style>`/`<script>` blocks, replaces every other tag with a space,
/// decodes the entities that actually show up in mail bodies, and collapses
/// whitespace runs.
pub fn html_to_text(html: &str) -> String {
    let no_style = STYLE_BLOCK.replace_all(html, "");
    let no_script = SCRIPT_BLOCK.replace_all(&no_style, "");
    let no_tags = HTML_TAG.replace_all(&no_script, " ");

    let decoded = no_tags
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    WHITESPACE_RUN.replace_all(&decoded, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── display_name tests ──────────────────────────────────────

    #[test]
    fn name_from_angle_form() {
        assert_eq!(display_name("Alice Smith <alice@example.com>"), "Alice Smith");
    }

    #[test]
    fn name_from_quoted_angle_form() {
        assert_eq!(display_name("\"Bob Jones\" <bob@example.com>"), "Bob Jones");
    }

    #[test]
    fn name_from_bare_address_uses_local_part() {
        assert_eq!(display_name("carol@example.com"), "carol");
    }

    #[test]
    fn nameless_angle_form_falls_back() {
        assert_eq!(display_name("<dave@example.com>"), "there");
    }

    #[test]
    fn empty_sender_falls_back() {
        assert_eq!(display_name(""), "there");
        assert_eq!(display_name("   "), "there");
    }

    // ── html_to_text tests ──────────────────────────────────────

    #[test]
    fn strips_tags() {
        let html = "<div><p>Hello <b>world</b></p></div>";
        assert_eq!(html_to_text(html), "Hello world");
    }

    #[test]
    fn drops_style_and_script_blocks() {
        let html = "<style>p { color: red; }</style><p>Visible</p><script>alert('x')</script>";
        assert_eq!(html_to_text(html), "Visible");
    }

    #[test]
    fn drops_multiline_style_block() {
        let html = "<STYLE type=\"text/css\">\nbody {\n  margin: 0;\n}\n</STYLE>Content";
        assert_eq!(html_to_text(html), "Content");
    }

    #[test]
    fn decodes_common_entities() {
        let html = "Q&amp;A: 5 &lt; 10 &amp;&nbsp;&quot;yes&quot;, it&#39;s true";
        assert_eq!(html_to_text(html), "Q&A: 5 < 10 & \"yes\", it's true");
    }

    #[test]
    fn collapses_whitespace_runs() {
        let html = "<p>one</p>\n\n\t<p>two</p>   three";
        assert_eq!(html_to_text(html), "one two three");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(html_to_text("just plain text"), "just plain text");
    }

    #[test]
    fn empty_input_gives_empty_output() {
        assert_eq!(html_to_text(""), "");
    }
}
