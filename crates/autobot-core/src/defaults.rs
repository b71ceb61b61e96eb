//! Centralized default constants for autobot.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers. Organized by domain area.

// =============================================================================
// KEYWORD RECOMMENDATION
// =============================================================================

/// Minimum final score a recommendation must reach to be kept.
pub const MIN_SCORE: f64 = 50.0;

/// Maximum recommendations returned by one orchestrator pass.
pub const MAX_RESULTS: usize = 20;

/// Result window used for trending recommendations.
pub const TRENDING_MAX_RESULTS: usize = 10;

/// Query used for trending recommendations when no domain is given.
pub const TRENDING_QUERY: &str = "trending";

/// Default page size when listing stored recommendations.
pub const LIST_LIMIT: i64 = 50;

/// Suffixes appended to a base keyword to build longtail variants.
pub const LONGTAIL_SUFFIXES: [&str; 10] = [
    "이란?",
    "사용법",
    "하는 방법",
    "완벽 가이드",
    "초보자 가이드",
    "설치 방법",
    "활용법",
    "비교",
    "장단점",
    "추천",
];

// =============================================================================
// SCORE BANDS
// =============================================================================

/// Upper bound of the search-volume sub-score.
pub const SEARCH_VOLUME_BAND: f64 = 30.0;

/// Upper bound of the competition sub-score.
pub const COMPETITION_BAND: f64 = 40.0;

/// Upper bound of the blog-fit sub-score.
pub const BLOG_FIT_BAND: f64 = 30.0;

/// Final score at or above which a keyword is recommended "high".
pub const HIGH_TIER_THRESHOLD: f64 = 70.0;

/// Final score at or above which a keyword is recommended "medium".
pub const MEDIUM_TIER_THRESHOLD: f64 = 50.0;

/// Word count at which a keyword is always longtail.
pub const LONGTAIL_WORD_COUNT: usize = 3;

// =============================================================================
// KEYWORD ANALYSIS
// =============================================================================

/// Number of top keywords reported by corpus analysis.
pub const ANALYSIS_TOP_N: usize = 20;

/// Minimum total frequency for a keyword to survive corpus analysis.
pub const ANALYSIS_MIN_FREQUENCY: u32 = 2;

/// Minimum number of documents a keyword must appear in.
pub const ANALYSIS_MIN_DOCUMENT_COUNT: usize = 1;

/// Maximum generated title length in characters.
pub const GENERATED_TITLE_MAX_CHARS: usize = 200;

// =============================================================================
// CONTENT / SEO
// =============================================================================

/// Target length (characters) for reconstructed posts.
pub const RECONSTRUCTION_TARGET_LENGTH: usize = 2000;

/// Recommended title length window.
pub const TITLE_MIN_CHARS: usize = 30;
pub const TITLE_MAX_CHARS: usize = 60;

/// Recommended meta description length window.
pub const META_MIN_CHARS: usize = 120;
pub const META_MAX_CHARS: usize = 160;

/// Minimum body length before a "write more" recommendation is emitted.
pub const CONTENT_MIN_CHARS: usize = 1000;

// =============================================================================
// GOOGLE / BLOGGER
// =============================================================================

/// Google OAuth 2.0 authorization endpoint.
pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";

/// Google OAuth 2.0 token endpoint.
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// OAuth scope granting Blogger read/write access.
pub const BLOGGER_SCOPE: &str = "https://www.googleapis.com/auth/blogger";

/// Blogger API v3 base URL.
pub const BLOGGER_API_URL: &str = "https://www.googleapis.com/blogger/v3";

/// Placeholder blog id stored until the user picks a blog.
pub const PLACEHOLDER_BLOG_ID: &str = "temp";

/// Placeholder blog name stored until the user picks a blog.
pub const PLACEHOLDER_BLOG_NAME: &str = "Google Blogger";

/// Default page size for Blogger post listings.
pub const BLOGGER_POSTS_LIMIT: u32 = 10;

/// Timeout for Google HTTP requests in seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 30;

/// Maximum pooled PostgreSQL connections.
pub const DATABASE_MAX_CONNECTIONS: u32 = 5;

/// Seconds to wait for a pooled connection.
pub const DATABASE_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Assumed token lifetime when the store has no expiry.
pub const TOKEN_DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

// =============================================================================
// SCHEDULING
// =============================================================================

/// Timezone used for publish schedules when none is configured.
pub const SCHEDULE_TIMEZONE: &str = "Asia/Seoul";

/// Domain used for schedules when none is configured.
pub const SCHEDULE_DOMAIN: &str = "default";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bands_sum_to_100() {
        assert_eq!(SEARCH_VOLUME_BAND + COMPETITION_BAND + BLOG_FIT_BAND, 100.0);
    }

    #[test]
    fn test_tier_thresholds_ordered() {
        assert!(HIGH_TIER_THRESHOLD > MEDIUM_TIER_THRESHOLD);
        assert_eq!(MIN_SCORE, MEDIUM_TIER_THRESHOLD);
    }

    #[test]
    fn test_longtail_suffixes_unique() {
        let mut sorted = LONGTAIL_SUFFIXES.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), LONGTAIL_SUFFIXES.len());
    }

    #[test]
    fn test_title_window() {
        assert!(TITLE_MIN_CHARS < TITLE_MAX_CHARS);
        assert!(META_MIN_CHARS < META_MAX_CHARS);
    }
}
