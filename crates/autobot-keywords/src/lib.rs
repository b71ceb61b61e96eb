//! # autobot-keywords
//!
//! Keyword scoring and recommendation for autobot.
//!
//! This crate provides:
//! - Keyword classification by word count and search volume
//! - Injectable metrics estimation (word-count bands, fixed fixtures)
//! - Banded scoring (search volume, competition, blog fit)
//! - Recommendation filtering and the orchestrator that ties them together
//! - A per-user keyword library over the recommendation repository
//! - Corpus keyword analysis and keyword-driven title helpers

pub mod analysis;
pub mod classifier;
pub mod filter;
pub mod library;
pub mod metrics;
pub mod recommend;
pub mod scoring;

pub use analysis::{
    aggregate, analyze, extract_keywords, title_from_keywords, AnalysisOptions, DocumentKeywords,
    KeywordAnalysis, KeywordFrequency,
};
pub use classifier::classify;
pub use filter::{filter, FilterOptions};
pub use library::KeywordLibrary;
pub use metrics::{FixedMetricsProvider, WordCountEstimator};
pub use recommend::{RecommendOptions, Recommender};
pub use scoring::{score, score_all};
