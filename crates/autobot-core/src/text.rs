//! Small text helpers shared by the keyword and content crates.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Number of whitespace-delimited tokens. The empty string has zero words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Round to one decimal place (`round(x * 10) / 10`).
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Split a free-text query into candidate keywords.
///
/// Separators are commas and line breaks; each piece is trimmed, empty pieces
/// are dropped, and duplicates keep their first position.
pub fn split_query(query: &str) -> Vec<String> {
    let pieces = query
        .split([',', '\n', '\r'])
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(str::to_string);
    dedup_preserving_order(pieces)
}

/// Remove duplicates while keeping the first occurrence of each item.
pub fn dedup_preserving_order<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

/// Remove every `<...>` tag from an HTML fragment.
pub fn strip_html(html: &str) -> String {
    HTML_TAG.replace_all(html, "").into_owned()
}

/// Character-based prefix, safe for multi-byte text.
pub fn take_chars(text: &str, n: usize) -> String {
    text.chars().take(n).collect()
}

/// Character length (not byte length).
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Truncate to `max` characters, replacing the tail with `...` when cut.
pub fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if char_len(text) <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    format!("{}...", take_chars(text, keep))
}
