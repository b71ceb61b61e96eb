//! Keyword score calculation.
//!
//! A keyword's final score (0–100) is the sum of three banded sub-scores:
//!
//! | sub-score     | band   | favours                               |
//! |---------------|--------|---------------------------------------|
//! | search volume | 0–30   | a 1,000–10,000 monthly-search sweet spot |
//! | competition   | 0–40   | low competition                       |
//! | blog fit      | 0–30   | strong blogs and longtail keywords    |
//!
//! The piecewise formulas are discontinuous at band edges (for example at
//! exactly 10,000 searches); they are reproduced as-is. Out-of-range inputs
//! are clamped, never rejected.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, trace};

use autobot_core::defaults::{
    BLOG_FIT_BAND, COMPETITION_BAND, LONGTAIL_WORD_COUNT, SEARCH_VOLUME_BAND,
};
use autobot_core::{
    round1, word_count, BlogAnalysis, KeywordMetrics, KeywordScore, KeywordType, Recommendation,
};

use crate::classifier::classify_words;

/// Search-volume sub-score used when volume is unknown.
const UNKNOWN_VOLUME_SCORE: f64 = 10.0;

/// Base blog-fit score before blog context is applied.
const BLOG_FIT_BASE: f64 = 15.0;

/// Blog-fit bonus for longtail keywords.
const LONGTAIL_BONUS: f64 = 5.0;

fn clamp_percent(value: f64) -> Option<f64> {
    if value.is_nan() {
        None
    } else {
        Some(value.clamp(0.0, 100.0))
    }
}

/// Search-volume fit, 0–30. Missing or zero volume scores a flat 10.
pub fn search_volume_score(search_volume: Option<u64>) -> f64 {
    let volume = match search_volume {
        None | Some(0) => return UNKNOWN_VOLUME_SCORE,
        Some(v) => v as f64,
    };

    let score = if volume >= 10_000.0 {
        (30.0 - volume / 10_000.0 * 5.0).max(15.0)
    } else if volume >= 1_000.0 {
        25.0 + volume / 1_000.0 * 0.5
    } else if volume >= 100.0 {
        15.0 + volume / 100.0 * 0.5
    } else {
        (volume / 10.0).max(5.0)
    };

    score.clamp(0.0, SEARCH_VOLUME_BAND)
}

/// Competition favourability, 0–40. Lower competition scores higher.
///
/// Without a competition level the keyword type stands in for it.
pub fn competition_score(competition_level: Option<f64>, keyword_type: KeywordType) -> f64 {
    let level = match competition_level.and_then(clamp_percent) {
        Some(level) => level,
        None => {
            return match keyword_type {
                KeywordType::Longtail => 35.0,
                KeywordType::Small => 30.0,
                KeywordType::Medium => 20.0,
                KeywordType::Large => 15.0,
            }
        }
    };

    let score = if level <= 30.0 {
        35.0 + (30.0 - level) / 30.0 * 5.0
    } else if level <= 60.0 {
        20.0 + (60.0 - level) / 30.0 * 15.0
    } else {
        (20.0 - (level - 60.0) / 40.0 * 15.0).max(5.0)
    };

    score.clamp(0.0, COMPETITION_BAND)
}

/// Fit between the keyword and the user's blog, 0–30.
pub fn blog_fit_score(words: usize, blog: Option<&BlogAnalysis>) -> f64 {
    let mut score = BLOG_FIT_BASE;

    if let Some(blog) = blog {
        if let Some(da) = blog.domain_authority.and_then(clamp_percent) {
            score += da / 100.0 * 10.0;
        }
        if let Some(perf) = blog.recent_post_performance.and_then(clamp_percent) {
            score += perf / 100.0 * 10.0;
        }
    }

    if words >= LONGTAIL_WORD_COUNT {
        score += LONGTAIL_BONUS;
    }

    score.min(BLOG_FIT_BAND)
}

/// Score one keyword.
///
/// The keyword type comes from `metrics` when already classified, otherwise
/// from the word count and search volume. Sub-scores are rounded to one
/// decimal and the final score is their sum, so
/// `final_score == search_volume_score + competition_score + blog_fit_score`.
pub fn score(keyword: &str, metrics: &KeywordMetrics, blog: Option<&BlogAnalysis>) -> KeywordScore {
    let words = word_count(keyword);
    let keyword_type = metrics
        .keyword_type
        .unwrap_or_else(|| classify_words(words, metrics.search_volume));

    let sv = round1(search_volume_score(metrics.search_volume));
    let comp = round1(competition_score(metrics.competition_level, keyword_type));
    let fit = round1(blog_fit_score(words, blog));
    let final_score = round1(sv + comp + fit);

    trace!(
        keyword,
        keyword_type = %keyword_type,
        search_volume_score = sv,
        competition_score = comp,
        blog_fit_score = fit,
        final_score,
        "Scored keyword"
    );

    KeywordScore {
        keyword: keyword.to_string(),
        search_volume: metrics.search_volume,
        competition_level: metrics.competition_level,
        keyword_type,
        word_count: words,
        final_score,
        search_volume_score: sv,
        competition_score: comp,
        blog_fit_score: fit,
        recommendation: Recommendation::from_score(final_score),
    }
}

/// Sort scores by final score, highest first. Ties keep their input order.
pub fn sort_by_score(scores: &mut [KeywordScore]) {
    scores.sort_by(|a, b| {
        b.final_score
            .partial_cmp(&a.final_score)
            .unwrap_or(Ordering::Equal)
    });
}

/// Score a batch of keywords and sort descending.
///
/// Keywords missing from `metrics` are scored with nothing known about them.
pub fn score_all(
    keywords: &[String],
    metrics: &HashMap<String, KeywordMetrics>,
    blog: Option<&BlogAnalysis>,
) -> Vec<KeywordScore> {
    let mut scores: Vec<KeywordScore> = keywords
        .iter()
        .map(|keyword| match metrics.get(keyword) {
            Some(m) => score(keyword, m, blog),
            None => score(keyword, &KeywordMetrics::new(keyword.as_str()), blog),
        })
        .collect();

    sort_by_score(&mut scores);
    debug!(
        keyword_count = keywords.len(),
        top_score = scores.first().map(|s| s.final_score),
        "Scored keyword batch"
    );
    scores
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.051
    }

    #[test]
    fn test_reference_example() {
        let metrics = KeywordMetrics::new("react hooks")
            .with_search_volume(5000)
            .with_competition(20.0);
        let s = score("react hooks", &metrics, None);

        assert_eq!(s.search_volume_score, 27.5);
        assert_eq!(s.competition_score, 36.7);
        assert_eq!(s.blog_fit_score, 15.0);
        assert_eq!(s.final_score, 79.2);
        assert_eq!(s.recommendation, Recommendation::High);
        assert_eq!(s.keyword_type, KeywordType::Medium);
    }

    #[test]
    fn test_search_volume_bands() {
        assert_eq!(search_volume_score(None), 10.0);
        assert_eq!(search_volume_score(Some(0)), 10.0);
        assert_eq!(search_volume_score(Some(50)), 5.0);
        assert_eq!(search_volume_score(Some(90)), 9.0);
        assert_eq!(search_volume_score(Some(100)), 15.5);
        assert_eq!(search_volume_score(Some(1_000)), 25.5);
        assert_eq!(search_volume_score(Some(10_000)), 25.0);
        assert_eq!(search_volume_score(Some(30_000)), 15.0);
        assert_eq!(search_volume_score(Some(10_000_000)), 15.0);
    }

    #[test]
    fn test_search_volume_discontinuity_kept() {
        // Just under 10,000 scores higher than exactly 10,000.
        assert!(search_volume_score(Some(9_999)) > search_volume_score(Some(10_000)));
    }

    #[test]
    fn test_competition_inferred_from_type() {
        assert_eq!(competition_score(None, KeywordType::Longtail), 35.0);
        assert_eq!(competition_score(None, KeywordType::Small), 30.0);
        assert_eq!(competition_score(None, KeywordType::Medium), 20.0);
        assert_eq!(competition_score(None, KeywordType::Large), 15.0);
    }

    #[test]
    fn test_competition_bands() {
        assert_eq!(competition_score(Some(0.0), KeywordType::Large), 40.0);
        assert_eq!(competition_score(Some(30.0), KeywordType::Large), 35.0);
        assert_eq!(competition_score(Some(60.0), KeywordType::Large), 20.0);
        assert_eq!(competition_score(Some(100.0), KeywordType::Large), 5.0);
    }

    #[test]
    fn test_competition_monotonic_non_increasing() {
        for kt in [
            KeywordType::Large,
            KeywordType::Medium,
            KeywordType::Small,
            KeywordType::Longtail,
        ] {
            let mut prev = f64::INFINITY;
            for step in -20..=240 {
                let level = step as f64 * 0.5;
                let s = competition_score(Some(level), kt);
                assert!(s <= prev, "score rose at level {}", level);
                assert!((0.0..=40.0).contains(&s));
                prev = s;
            }
        }
    }

    #[test]
    fn test_competition_out_of_range_clamped() {
        assert_eq!(competition_score(Some(-15.0), KeywordType::Small), 40.0);
        assert_eq!(competition_score(Some(250.0), KeywordType::Small), 5.0);
        assert_eq!(competition_score(Some(f64::NAN), KeywordType::Small), 30.0);
    }

    #[test]
    fn test_blog_fit() {
        assert_eq!(blog_fit_score(1, None), 15.0);
        assert_eq!(blog_fit_score(3, None), 20.0);

        let blog = BlogAnalysis {
            domain_authority: Some(50.0),
            recent_post_performance: Some(20.0),
            ..Default::default()
        };
        assert!(close(blog_fit_score(1, Some(&blog)), 22.0));

        let strong = BlogAnalysis {
            domain_authority: Some(100.0),
            recent_post_performance: Some(100.0),
            ..Default::default()
        };
        assert_eq!(blog_fit_score(4, Some(&strong)), 30.0);

        let noisy = BlogAnalysis {
            domain_authority: Some(-40.0),
            recent_post_performance: Some(400.0),
            ..Default::default()
        };
        assert_eq!(blog_fit_score(1, Some(&noisy)), 25.0);
    }

    #[test]
    fn test_sum_invariant_and_tier() {
        let cases = [
            ("a", None, None),
            ("a b", Some(2_345), Some(47.3)),
            ("a b c", Some(333), Some(12.9)),
            ("a", Some(55_555), Some(88.8)),
            ("a b", Some(7), Some(61.1)),
        ];
        let blog = BlogAnalysis {
            domain_authority: Some(33.3),
            recent_post_performance: Some(66.6),
            ..Default::default()
        };

        for (kw, sv, comp) in cases {
            let mut m = KeywordMetrics::new(kw);
            m.search_volume = sv;
            m.competition_level = comp;
            for b in [None, Some(&blog)] {
                let s = score(kw, &m, b);
                let sum = s.search_volume_score + s.competition_score + s.blog_fit_score;
                assert!((sum - s.final_score).abs() <= 0.1);
                assert!((0.0..=100.0).contains(&s.final_score));
                assert_eq!(s.recommendation, Recommendation::from_score(s.final_score));
            }
        }
    }

    #[test]
    fn test_preclassified_type_respected() {
        let m = KeywordMetrics::new("react").with_keyword_type(KeywordType::Longtail);
        let s = score("react", &m, None);
        assert_eq!(s.keyword_type, KeywordType::Longtail);
        assert_eq!(s.competition_score, 35.0);
    }

    #[test]
    fn test_score_all_sorted_and_stable() {
        let keywords: Vec<String> = ["one", "two", "three words here", "four"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let mut metrics = HashMap::new();
        metrics.insert(
            "two".to_string(),
            KeywordMetrics::new("two").with_search_volume(5000).with_competition(20.0),
        );

        let scores = score_all(&keywords, &metrics, None);
        assert_eq!(scores.len(), 4);
        assert_eq!(scores[0].keyword, "two");
        for pair in scores.windows(2) {
            assert!(pair[0].final_score >= pair[1].final_score);
        }
        // "one" and "four" tie; input order wins.
        let one = scores.iter().position(|s| s.keyword == "one").unwrap();
        let four = scores.iter().position(|s| s.keyword == "four").unwrap();
        assert!(one < four);
    }
}
