//! Cleaning of free-text user input before it reaches the store.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Tags kept in submitted definitions and examples.
pub const RICH_TEXT_TAGS: &[&str] = &["i", "b"];

static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment pattern"));
static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"<\s*(/?)\s*([a-zA-Z][a-zA-Z0-9]*)[^>]*>").expect("valid tag pattern")
});
static LINK_SCHEME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://").expect("valid scheme pattern"));

/// Decodes HTML entities, then removes every tag not listed in `allowed`.
/// Allowed tags are re-emitted bare, without attributes. Decoding first means
/// markup smuggled in as entities is stripped too.
pub fn clean(input: &str, allowed: &[&str]) -> String {
    let decoded = unescape(input);
    let without_comments = COMMENT.replace_all(&decoded, "");
    let stripped = TAG.replace_all(&without_comments, |caps: &Captures| {
        let name = caps[2].to_ascii_lowercase();
        if allowed.contains(&name.as_str()) {
            format!("<{}{}>", &caps[1], name)
        } else {
            String::new()
        }
    });
    stripped.trim().to_string()
}

/// Plain text: no markup at all.
pub fn clean_text(input: &str) -> String {
    clean(input, &[])
}

/// Decodes numeric and named HTML entities; unknown names are left as-is.
pub fn unescape(input: &str) -> String {
    html_escape::decode_html_entities(input).into_owned()
}

/// Ensures a non-empty link carries an http(s) scheme.
pub fn normalize_link(link: &str) -> String {
    let link = link.trim();
    if link.is_empty() || LINK_SCHEME.is_match(link) {
        link.to_string()
    } else {
        format!("https://{link}")
    }
}
