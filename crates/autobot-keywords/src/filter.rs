//! Recommendation filtering over scored keywords.

use serde::{Deserialize, Serialize};

use autobot_core::defaults::MIN_SCORE;
use autobot_core::{KeywordScore, KeywordType, Recommendation};

/// Predicates applied by [`filter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Minimum final score (inclusive).
    pub min_score: f64,
    /// Keep only this tier.
    pub recommendation: Option<Recommendation>,
    /// Keep only these keyword types.
    pub keyword_types: Option<Vec<KeywordType>>,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            min_score: MIN_SCORE,
            recommendation: None,
            keyword_types: None,
        }
    }
}

impl FilterOptions {
    pub fn with_min_score(mut self, min_score: f64) -> Self {
        self.min_score = min_score;
        self
    }

    pub fn with_recommendation(mut self, recommendation: Recommendation) -> Self {
        self.recommendation = Some(recommendation);
        self
    }

    pub fn with_keyword_types(mut self, types: impl Into<Vec<KeywordType>>) -> Self {
        self.keyword_types = Some(types.into());
        self
    }

    /// Whether a single score passes every predicate.
    pub fn matches(&self, score: &KeywordScore) -> bool {
        if score.final_score < self.min_score {
            return false;
        }
        if let Some(tier) = self.recommendation {
            if score.recommendation != tier {
                return false;
            }
        }
        if let Some(ref types) = self.keyword_types {
            if !types.contains(&score.keyword_type) {
                return false;
            }
        }
        true
    }
}

/// Keep the scores that pass `options`, preserving input order.
pub fn filter(scores: Vec<KeywordScore>, options: &FilterOptions) -> Vec<KeywordScore> {
    scores.into_iter().filter(|s| options.matches(s)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make(keyword: &str, final_score: f64, keyword_type: KeywordType) -> KeywordScore {
        KeywordScore {
            keyword: keyword.to_string(),
            search_volume: None,
            competition_level: None,
            keyword_type,
            word_count: 1,
            final_score,
            search_volume_score: 0.0,
            competition_score: 0.0,
            blog_fit_score: final_score,
            recommendation: Recommendation::from_score(final_score),
        }
    }

    fn sample() -> Vec<KeywordScore> {
        vec![
            make("a", 82.0, KeywordType::Medium),
            make("b", 71.0, KeywordType::Longtail),
            make("c", 50.0, KeywordType::Large),
            make("d", 49.9, KeywordType::Small),
            make("e", 65.0, KeywordType::Longtail),
        ]
    }

    #[test]
    fn test_empty_input() {
        assert!(filter(Vec::new(), &FilterOptions::default()).is_empty());
    }

    #[test]
    fn test_default_min_score() {
        let kept = filter(sample(), &FilterOptions::default());
        let names: Vec<&str> = kept.iter().map(|s| s.keyword.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "e"]);
        assert!(kept.iter().all(|s| s.final_score >= 50.0));
    }

    #[test]
    fn test_tier_filter() {
        let opts = FilterOptions::default().with_recommendation(Recommendation::Medium);
        let kept = filter(sample(), &opts);
        let names: Vec<&str> = kept.iter().map(|s| s.keyword.as_str()).collect();
        assert_eq!(names, vec!["c", "e"]);
    }

    #[test]
    fn test_type_filter_preserves_order() {
        let opts = FilterOptions::default()
            .with_min_score(0.0)
            .with_keyword_types([KeywordType::Longtail, KeywordType::Small]);
        let kept = filter(sample(), &opts);
        let names: Vec<&str> = kept.iter().map(|s| s.keyword.as_str()).collect();
        assert_eq!(names, vec!["b", "d", "e"]);
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let opts: FilterOptions = serde_json::from_str(r#"{"recommendation":"high"}"#).unwrap();
        assert_eq!(opts.min_score, 50.0);
        assert_eq!(opts.recommendation, Some(Recommendation::High));
    }
}
