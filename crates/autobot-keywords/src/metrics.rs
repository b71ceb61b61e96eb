//! Search-volume and competition estimation.
//!
//! [`WordCountEstimator`] is the default [`MetricsProvider`]: it samples
//! volume and competition from word-count buckets until a real search data
//! source is wired in. [`FixedMetricsProvider`] returns canned values for
//! tests and offline runs.

use std::collections::HashMap;
use std::ops::Range;
use std::sync::Mutex;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

use autobot_core::{word_count, Error, EstimatedMetrics, MetricsProvider, Result};

/// Sampling ranges for one word-count bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimateBand {
    /// Monthly search volume, half-open.
    pub search_volume: Range<u64>,
    /// Competition level 0–100, half-open.
    pub competition: Range<u32>,
}

/// Bucket for a keyword with `words` whitespace-delimited tokens.
///
/// Single words are high-volume/high-competition, two words sit in the
/// middle, and three or more are treated as longtail.
pub fn band_for(words: usize) -> EstimateBand {
    match words {
        1 => EstimateBand {
            search_volume: 10_000..60_000,
            competition: 60..100,
        },
        2 => EstimateBand {
            search_volume: 1_000..6_000,
            competition: 30..60,
        },
        _ => EstimateBand {
            search_volume: 100..600,
            competition: 0..30,
        },
    }
}

fn require_keyword(keyword: &str) -> Result<&str> {
    let trimmed = keyword.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("keyword cannot be empty".to_string()));
    }
    Ok(trimmed)
}

/// Bounded random estimator keyed off word count.
pub struct WordCountEstimator {
    rng: Mutex<StdRng>,
}

impl WordCountEstimator {
    /// Estimator seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible estimator for tests.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn sample(&self, band: &EstimateBand) -> Result<EstimatedMetrics> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| Error::Internal("estimator rng lock poisoned".to_string()))?;
        let search_volume = rng.gen_range(band.search_volume.clone());
        let competition = rng.gen_range(band.competition.clone());
        Ok(EstimatedMetrics {
            search_volume,
            competition_level: competition as f64,
        })
    }
}

impl Default for WordCountEstimator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetricsProvider for WordCountEstimator {
    async fn estimate(&self, keyword: &str) -> Result<EstimatedMetrics> {
        let keyword = require_keyword(keyword)?;
        let band = band_for(word_count(keyword));
        let metrics = self.sample(&band)?;
        trace!(
            keyword,
            search_volume = metrics.search_volume,
            competition = metrics.competition_level,
            "Estimated keyword metrics"
        );
        Ok(metrics)
    }

    fn name(&self) -> &str {
        "word_count"
    }
}

/// Metrics provider backed by a fixed table.
#[derive(Debug, Clone, Default)]
pub struct FixedMetricsProvider {
    table: HashMap<String, EstimatedMetrics>,
    fallback: Option<EstimatedMetrics>,
}

impl FixedMetricsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metrics for one keyword.
    pub fn with(mut self, keyword: impl Into<String>, search_volume: u64, competition: f64) -> Self {
        self.table.insert(
            keyword.into(),
            EstimatedMetrics {
                search_volume,
                competition_level: competition,
            },
        );
        self
    }

    /// Metrics returned for keywords not in the table.
    pub fn with_fallback(mut self, search_volume: u64, competition: f64) -> Self {
        self.fallback = Some(EstimatedMetrics {
            search_volume,
            competition_level: competition,
        });
        self
    }
}

#[async_trait]
impl MetricsProvider for FixedMetricsProvider {
    async fn estimate(&self, keyword: &str) -> Result<EstimatedMetrics> {
        let keyword = require_keyword(keyword)?;
        self.table
            .get(keyword)
            .copied()
            .or(self.fallback)
            .ok_or_else(|| Error::NotFound(format!("no metrics for keyword: {}", keyword)))
    }

    fn name(&self) -> &str {
        "fixed"
    }
}
