//! Keyword size classification.
//!
//! Word count dominates: three or more words is always longtail. Shorter
//! keywords are bucketed by search volume when one is known, otherwise by
//! word count alone.

use autobot_core::defaults::LONGTAIL_WORD_COUNT;
use autobot_core::{word_count, KeywordType};

/// Classify a keyword by word count and (optional) search volume.
///
/// | words | volume      | type     |
/// |-------|-------------|----------|
/// | ≥ 3   | any         | longtail |
/// | 1–2   | ≥ 10000     | large    |
/// | 1–2   | ≥ 1000      | medium   |
/// | 1–2   | < 1000      | small    |
/// | 1     | unknown     | large    |
/// | 2     | unknown     | medium   |
/// | 0     | unknown     | small    |
pub fn classify(keyword: &str, search_volume: Option<u64>) -> KeywordType {
    classify_words(word_count(keyword), search_volume)
}

/// Same as [`classify`] for a precomputed word count.
pub fn classify_words(words: usize, search_volume: Option<u64>) -> KeywordType {
    if words >= LONGTAIL_WORD_COUNT {
        return KeywordType::Longtail;
    }

    if let Some(volume) = search_volume {
        return if volume >= 10_000 {
            KeywordType::Large
        } else if volume >= 1_000 {
            KeywordType::Medium
        } else {
            KeywordType::Small
        };
    }

    match words {
        1 => KeywordType::Large,
        2 => KeywordType::Medium,
        // Empty keywords (zero words) fall through here.
        _ => KeywordType::Small,
    }
}
