//! Keyword recommendation orchestration.
//!
//! A pass turns a free-text query into scored, ranked recommendations:
//!
//! 1. split the query into candidate keywords (commas and line breaks)
//! 2. optionally add longtail variants (`"{keyword} {suffix}"`), keeping at
//!    most twice the result window
//! 3. ask the [`MetricsProvider`] for volume/competition per candidate
//! 4. score, sort descending (stable), filter, truncate
//! 5. stamp every survivor with one `collected_at`/`recommended_at` time
//!
//! Nothing is persisted here; see [`crate::library::KeywordLibrary`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use autobot_core::defaults::{
    LONGTAIL_SUFFIXES, MAX_RESULTS, MIN_SCORE, TRENDING_MAX_RESULTS, TRENDING_QUERY,
};
use autobot_core::{
    dedup_preserving_order, split_query, BlogAnalysis, KeywordMetrics, KeywordType,
    MetricsProvider, RecommendedKeyword, Result,
};

use crate::filter::{filter, FilterOptions};
use crate::metrics::WordCountEstimator;
use crate::scoring::score_all;

/// Candidates fetched per requested result.
const CANDIDATES_PER_RESULT: usize = 2;

/// Types kept when longtail keywords are prioritized.
const PRIORITIZED_TYPES: [KeywordType; 3] =
    [KeywordType::Longtail, KeywordType::Small, KeywordType::Medium];

/// Options for one recommendation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendOptions {
    /// Topic domain, used by trending recommendations.
    pub domain: Option<String>,
    /// Minimum final score kept.
    pub min_score: f64,
    /// Result window.
    pub max_results: usize,
    /// Expand with longtail variants and drop `large` keywords.
    pub prioritize_longtail: bool,
    /// Context about the user's blog.
    pub blog_analysis: Option<BlogAnalysis>,
}

impl Default for RecommendOptions {
    fn default() -> Self {
        Self {
            domain: None,
            min_score: MIN_SCORE,
            max_results: MAX_RESULTS,
            prioritize_longtail: true,
            blog_analysis: None,
        }
    }
}

impl RecommendOptions {
    fn filter_options(&self) -> FilterOptions {
        let base = FilterOptions::default().with_min_score(self.min_score);
        if self.prioritize_longtail {
            base.with_keyword_types(PRIORITIZED_TYPES)
        } else {
            base
        }
    }
}

/// `"{base} {suffix}"` for every base keyword and longtail suffix.
pub fn longtail_variants(base_keywords: &[String]) -> Vec<String> {
    let variants = base_keywords.iter().flat_map(|base| {
        LONGTAIL_SUFFIXES
            .iter()
            .map(move |suffix| format!("{} {}", base, suffix))
    });
    dedup_preserving_order(variants)
}

/// Candidate keywords for a query, in first-seen order.
pub fn expand_candidates(query: &str, with_longtail: bool) -> Vec<String> {
    let base = split_query(query);
    if !with_longtail || base.is_empty() {
        return base;
    }
    let variants = longtail_variants(&base);
    dedup_preserving_order(base.into_iter().chain(variants))
}

/// Recommendation orchestrator over an injected metrics source.
#[derive(Clone)]
pub struct Recommender {
    provider: Arc<dyn MetricsProvider>,
}

impl Recommender {
    pub fn new(provider: Arc<dyn MetricsProvider>) -> Self {
        Self { provider }
    }

    /// Recommender backed by the word-count estimator.
    pub fn with_default_estimator() -> Self {
        Self::new(Arc::new(WordCountEstimator::new()))
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Fetch metrics for every candidate.
    ///
    /// A candidate the provider cannot estimate is scored with no metrics;
    /// an unavailable provider fails the whole pass.
    async fn collect_metrics(&self, candidates: &[String]) -> Result<HashMap<String, KeywordMetrics>> {
        let mut metrics = HashMap::with_capacity(candidates.len());
        for keyword in candidates {
            match self.provider.estimate(keyword).await {
                Ok(est) => {
                    metrics.insert(
                        keyword.clone(),
                        KeywordMetrics::new(keyword.as_str())
                            .with_search_volume(est.search_volume)
                            .with_competition(est.competition_level),
                    );
                }
                Err(e) if e.is_upstream() => return Err(e),
                Err(e) => {
                    warn!(
                        keyword = %keyword,
                        provider = self.provider.name(),
                        error = %e,
                        "Metrics unavailable for keyword, scoring without them"
                    );
                }
            }
        }
        Ok(metrics)
    }

    async fn rank(
        &self,
        candidates: Vec<String>,
        filter_options: &FilterOptions,
        blog: Option<&BlogAnalysis>,
        max_results: Option<usize>,
    ) -> Result<Vec<RecommendedKeyword>> {
        if candidates.is_empty() {
            debug!("No candidate keywords");
            return Ok(Vec::new());
        }

        let metrics = self.collect_metrics(&candidates).await?;
        let scored = score_all(&candidates, &metrics, blog);
        let mut kept = filter(scored, filter_options);
        if let Some(max) = max_results {
            kept.truncate(max);
        }

        let now = Utc::now();
        Ok(kept
            .into_iter()
            .map(|score| RecommendedKeyword::unsaved(score, now))
            .collect())
    }

    /// Score and rank keywords for a free-text query.
    ///
    /// An empty query (or one that is only separators) yields an empty list.
    #[instrument(skip(self, options), fields(
        subsystem = "keywords",
        component = "recommender",
        op = "recommend",
        query = %query,
    ))]
    pub async fn recommend(
        &self,
        query: &str,
        options: &RecommendOptions,
    ) -> Result<Vec<RecommendedKeyword>> {
        let start = Instant::now();
        let mut candidates = expand_candidates(query, options.prioritize_longtail);
        candidates.truncate(options.max_results.saturating_mul(CANDIDATES_PER_RESULT));
        let candidate_count = candidates.len();

        let recs = self
            .rank(
                candidates,
                &options.filter_options(),
                options.blog_analysis.as_ref(),
                Some(options.max_results),
            )
            .await?;

        info!(
            candidate_count,
            result_count = recs.len(),
            provider = self.provider.name(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Keyword recommendation completed"
        );
        Ok(recs)
    }

    /// Longtail-only recommendations built from suffix variants of each
    /// base keyword. Results are sorted but not truncated.
    #[instrument(skip(self, base_keywords, options), fields(
        subsystem = "keywords",
        component = "recommender",
        op = "recommend_longtail",
        base_count = base_keywords.len(),
    ))]
    pub async fn recommend_longtail(
        &self,
        base_keywords: &[String],
        options: &RecommendOptions,
    ) -> Result<Vec<RecommendedKeyword>> {
        let start = Instant::now();
        let bases: Vec<String> = dedup_preserving_order(
            base_keywords
                .iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
        );
        let candidates = longtail_variants(&bases);
        let candidate_count = candidates.len();

        let filter_options = FilterOptions::default()
            .with_min_score(options.min_score)
            .with_keyword_types([KeywordType::Longtail]);
        let recs = self
            .rank(
                candidates,
                &filter_options,
                options.blog_analysis.as_ref(),
                None,
            )
            .await?;

        info!(
            candidate_count,
            result_count = recs.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Longtail recommendation completed"
        );
        Ok(recs)
    }

    /// Recommendations for a domain (or a generic trending query), capped at
    /// ten results.
    pub async fn recommend_trending(
        &self,
        domain: Option<&str>,
        options: &RecommendOptions,
    ) -> Result<Vec<RecommendedKeyword>> {
        let query = domain
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(TRENDING_QUERY);
        let options = RecommendOptions {
            max_results: TRENDING_MAX_RESULTS,
            ..options.clone()
        };
        self.recommend(query, &options).await
    }
}
