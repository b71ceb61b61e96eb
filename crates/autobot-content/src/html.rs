//! Regex-level HTML inspection for blog fragments.
//!
//! Posts are small, trusted fragments produced by the editor, so a handful
//! of patterns is enough; nothing here parses a full DOM.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use autobot_core::strip_html;
use autobot_core::text::char_len;

static H2_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<h2[^>]*>(.*?)</h2>").expect("valid regex"));

static IMG_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<img[^>]+>").expect("valid regex"));

static ALT_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)alt=["']([^"']+)["']"#).expect("valid regex"));

static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\n+").expect("valid regex"));

/// Complete `<h2>…</h2>` elements, in document order.
pub fn h2_elements(html: &str) -> Vec<String> {
    H2_TAG
        .find_iter(html)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// `<img …>` tags, in document order.
pub fn img_tags(html: &str) -> Vec<&str> {
    IMG_TAG.find_iter(html).map(|m| m.as_str()).collect()
}

/// Value of a tag's `alt` attribute, when present and non-empty.
pub fn alt_text(tag: &str) -> Option<&str> {
    ALT_ATTR
        .captures(tag)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Non-blank paragraphs separated by blank lines.
pub fn paragraphs(text: &str) -> Vec<&str> {
    PARAGRAPH_BREAK
        .split(text)
        .filter(|p| !p.trim().is_empty())
        .collect()
}

/// Case-insensitive occurrences of `keyword` in `text`. Empty keywords never
/// match.
pub fn count_occurrences(text: &str, keyword: &str) -> usize {
    if keyword.is_empty() {
        return 0;
    }
    RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
        .map(|re| re.find_iter(text).count())
        .unwrap_or(0)
}

/// Keyword density of an HTML fragment, in percent of visible characters.
///
/// `None` when the fragment has no visible text.
pub fn keyword_density(html: &str, keywords: &[String]) -> Option<f64> {
    let text = strip_html(html);
    let len = char_len(&text);
    if len == 0 {
        return None;
    }
    let hits: usize = keywords.iter().map(|k| count_occurrences(&text, k)).sum();
    Some(hits as f64 / len as f64 * 100.0)
}
