//! Corpus keyword analysis.
//!
//! Tokenizes documents into candidate keywords, aggregates frequencies
//! across documents, and matches the result against per-domain title
//! patterns. Tokenization is whitespace-based with a small Korean stop-word
//! list; there is no morphological analysis.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use autobot_core::defaults::{
    ANALYSIS_MIN_DOCUMENT_COUNT, ANALYSIS_MIN_FREQUENCY, ANALYSIS_TOP_N,
    GENERATED_TITLE_MAX_CHARS,
};
use autobot_core::text::truncate_with_ellipsis;

/// Anything that is not an ASCII word character, whitespace, or Hangul.
static NON_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s가-힣]").expect("valid regex"));

static TITLE_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-_]+").expect("valid regex"));

const STOP_WORDS: &[&str] = &[
    "그리고", "그런데", "하지만", "그러나", "또한", "또", "또는", "이것", "저것", "그것", "이런",
    "저런", "그런", "있다", "없다", "되다", "하다", "이다", "의", "을", "를", "에", "에서", "로",
    "으로", "가", "이", "와", "과", "도", "만", "까지",
];

/// Minimum token length in characters.
const MIN_TOKEN_CHARS: usize = 2;

/// Placeholder replaced by the keyword in a title pattern.
const PATTERN_SLOT: char = '~';

const AI_PATTERNS: &[&str] = &[
    "~이란?",
    "~란?",
    "~란 무엇인가",
    "~사용법",
    "~하는 방법",
    "~완벽 가이드",
    "~초보자 가이드",
    "~설치 방법",
    "~활용법",
    "~비교",
];

const TECH_PATTERNS: &[&str] = &[
    "~이란?",
    "~사용법",
    "~설치 방법",
    "~완벽 가이드",
    "~비교",
    "~장단점",
    "~추천",
];

const DEFAULT_PATTERNS: &[&str] = &["~이란?", "~사용법", "~하는 방법", "~완벽 가이드"];

/// Title patterns popular in a domain. Unknown domains use the default set.
pub fn domain_patterns(domain: &str) -> &'static [&'static str] {
    match domain {
        "ai" => AI_PATTERNS,
        "tech" => TECH_PATTERNS,
        _ => DEFAULT_PATTERNS,
    }
}

fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

fn tokens(text: &str) -> Vec<String> {
    NON_WORD
        .replace_all(text, " ")
        .split_whitespace()
        .filter(|w| w.chars().count() >= MIN_TOKEN_CHARS)
        .filter(|w| !is_stop_word(w))
        .map(str::to_string)
        .collect()
}

/// Distinct keywords in `text`, in first-seen order.
pub fn extract_keywords(text: &str) -> Vec<String> {
    autobot_core::dedup_preserving_order(tokens(text))
}

/// Keyword occurrence counts in `text`, in first-seen order.
pub fn count_keywords(text: &str) -> Vec<(String, u32)> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, u32)> = Vec::new();
    for token in tokens(text) {
        match index.get(&token) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(token.clone(), counts.len());
                counts.push((token, 1));
            }
        }
    }
    counts
}

/// Keywords found in one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentKeywords {
    pub document_id: String,
    pub keywords: Vec<String>,
    /// Occurrences per keyword, in first-seen order.
    pub keyword_counts: Vec<(String, u32)>,
}

impl DocumentKeywords {
    /// Tokenize a document.
    pub fn from_text(document_id: impl Into<String>, text: &str) -> Self {
        let keyword_counts = count_keywords(text);
        let keywords = keyword_counts.iter().map(|(k, _)| k.clone()).collect();
        Self {
            document_id: document_id.into(),
            keywords,
            keyword_counts,
        }
    }
}

/// Aggregated statistics for one keyword across a corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordFrequency {
    pub keyword: String,
    /// Total occurrences.
    pub frequency: u32,
    /// Number of distinct documents containing the keyword.
    pub document_count: usize,
    /// Ids of those documents, in first-seen order.
    pub documents: Vec<String>,
}

/// Sum counts per keyword across documents, most frequent first.
/// Ties keep first-seen order.
pub fn aggregate(documents: &[DocumentKeywords]) -> Vec<KeywordFrequency> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<KeywordFrequency> = Vec::new();

    for doc in documents {
        for (keyword, count) in &doc.keyword_counts {
            let i = *index.entry(keyword.as_str()).or_insert_with(|| {
                out.push(KeywordFrequency {
                    keyword: keyword.clone(),
                    frequency: 0,
                    document_count: 0,
                    documents: Vec::new(),
                });
                out.len() - 1
            });
            let entry = &mut out[i];
            entry.frequency += count;
            if !entry.documents.contains(&doc.document_id) {
                entry.documents.push(doc.document_id.clone());
                entry.document_count = entry.documents.len();
            }
        }
    }

    out.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    out
}

/// Options for [`analyze`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub top_n: usize,
    pub min_frequency: u32,
    pub min_document_count: usize,
    /// Key into the domain pattern tables (`ai`, `tech`, `default`).
    pub domain: String,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_n: ANALYSIS_TOP_N,
            min_frequency: ANALYSIS_MIN_FREQUENCY,
            min_document_count: ANALYSIS_MIN_DOCUMENT_COUNT,
            domain: "default".to_string(),
        }
    }
}

/// Result of a corpus analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordAnalysis {
    /// Keywords passing the frequency and document-count thresholds.
    pub keywords: Vec<KeywordFrequency>,
    pub top_keywords: Vec<KeywordFrequency>,
    /// Keywords containing one of the domain's title patterns.
    pub domain_keywords: Vec<KeywordFrequency>,
    pub total_documents: usize,
}

pub fn analyze(documents: &[DocumentKeywords], options: &AnalysisOptions) -> KeywordAnalysis {
    let keywords: Vec<KeywordFrequency> = aggregate(documents)
        .into_iter()
        .filter(|kw| {
            kw.frequency >= options.min_frequency
                && kw.document_count >= options.min_document_count
        })
        .collect();

    let top_keywords: Vec<KeywordFrequency> =
        keywords.iter().take(options.top_n).cloned().collect();

    let fragments: Vec<String> = domain_patterns(&options.domain)
        .iter()
        .map(|p| p.replacen(PATTERN_SLOT, "", 1))
        .collect();
    let domain_keywords: Vec<KeywordFrequency> = keywords
        .iter()
        .filter(|kw| fragments.iter().any(|f| kw.keyword.contains(f.as_str())))
        .cloned()
        .collect();

    debug!(
        total_documents = documents.len(),
        keyword_count = keywords.len(),
        domain_matches = domain_keywords.len(),
        domain = %options.domain,
        "Keyword analysis complete"
    );

    KeywordAnalysis {
        keywords,
        top_keywords,
        domain_keywords,
        total_documents: documents.len(),
    }
}

/// Build a title from ranked keywords.
///
/// With a pattern, the first `~` is replaced by the top keyword. Otherwise
/// the top three keywords contribute all their words and the rest at most
/// two words each. Titles are capped at 200 characters.
pub fn title_from_keywords(keywords: &[String], pattern: Option<&str>) -> String {
    let Some(first) = keywords.first() else {
        return String::new();
    };

    if let Some(pattern) = pattern {
        return pattern.replacen(PATTERN_SLOT, first, 1);
    }

    let important = keywords.len().min(3);
    let mut parts: Vec<&str> = Vec::new();
    for keyword in &keywords[..important] {
        parts.extend(TITLE_SPLIT.split(keyword).filter(|w| !w.is_empty()));
    }
    for keyword in &keywords[important..] {
        parts.extend(TITLE_SPLIT.split(keyword).filter(|w| !w.is_empty()).take(2));
    }

    truncate_with_ellipsis(&parts.join(" "), GENERATED_TITLE_MAX_CHARS)
}

/// `<h2>` heading for a keyword.
pub fn h2_with_keyword(keyword: &str) -> String {
    format!("<h2>{}</h2>", keyword)
}
