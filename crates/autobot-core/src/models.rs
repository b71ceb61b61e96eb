//! Domain models shared across autobot crates.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::defaults::{HIGH_TIER_THRESHOLD, MEDIUM_TIER_THRESHOLD};
use crate::error::Error;
use crate::text::word_count;

// =============================================================================
// KEYWORD TYPES
// =============================================================================

/// Size class of a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordType {
    Large,
    Medium,
    Small,
    Longtail,
}

impl KeywordType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Large => "large",
            Self::Medium => "medium",
            Self::Small => "small",
            Self::Longtail => "longtail",
        }
    }
}

impl fmt::Display for KeywordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeywordType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "large" => Ok(Self::Large),
            "medium" => Ok(Self::Medium),
            "small" => Ok(Self::Small),
            "longtail" => Ok(Self::Longtail),
            other => Err(Error::InvalidArgument(format!(
                "unknown keyword type: {}",
                other
            ))),
        }
    }
}

/// Recommendation tier derived from a final score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    High,
    Medium,
    Low,
}

impl Recommendation {
    /// high ≥ 70, medium ≥ 50, otherwise low.
    pub fn from_score(final_score: f64) -> Self {
        if final_score >= HIGH_TIER_THRESHOLD {
            Self::High
        } else if final_score >= MEDIUM_TIER_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Recommendation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(Error::InvalidArgument(format!(
                "unknown recommendation tier: {}",
                other
            ))),
        }
    }
}

/// User feedback on a recommended keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feedback {
    Positive,
    Negative,
}

impl Feedback {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
        }
    }
}

impl FromStr for Feedback {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "positive" => Ok(Self::Positive),
            "negative" => Ok(Self::Negative),
            other => Err(Error::InvalidArgument(format!("unknown feedback: {}", other))),
        }
    }
}

// =============================================================================
// KEYWORD RECORDS
// =============================================================================

/// Per-keyword facts fed into scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMetrics {
    pub keyword: String,
    /// Estimated monthly searches.
    pub search_volume: Option<u64>,
    /// 0–100, higher means more competitive.
    pub competition_level: Option<f64>,
    /// Pre-classified type; scoring fills it in when absent.
    pub keyword_type: Option<KeywordType>,
    pub word_count: usize,
}

impl KeywordMetrics {
    /// Metrics with nothing known beyond the keyword itself.
    pub fn new(keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        let word_count = word_count(&keyword);
        Self {
            keyword,
            search_volume: None,
            competition_level: None,
            keyword_type: None,
            word_count,
        }
    }

    pub fn with_search_volume(mut self, volume: u64) -> Self {
        self.search_volume = Some(volume);
        self
    }

    pub fn with_competition(mut self, level: f64) -> Self {
        self.competition_level = Some(level);
        self
    }

    pub fn with_keyword_type(mut self, keyword_type: KeywordType) -> Self {
        self.keyword_type = Some(keyword_type);
        self
    }
}

/// Volume and competition estimate produced by a metrics provider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatedMetrics {
    pub search_volume: u64,
    pub competition_level: f64,
}

/// Caller-supplied context about the user's blog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlogAnalysis {
    /// 0–100
    pub domain_authority: Option<f64>,
    pub average_post_length: Option<u32>,
    pub backlink_count: Option<u64>,
    /// 0–100
    pub recent_post_performance: Option<f64>,
}

/// A scored keyword.
///
/// `final_score` is the sum of the three rounded sub-scores and
/// `recommendation` is always `Recommendation::from_score(final_score)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordScore {
    pub keyword: String,
    pub search_volume: Option<u64>,
    pub competition_level: Option<f64>,
    pub keyword_type: KeywordType,
    pub word_count: usize,
    pub final_score: f64,
    pub search_volume_score: f64,
    pub competition_score: f64,
    pub blog_fit_score: f64,
    pub recommendation: Recommendation,
}

/// A scored keyword with its persistence lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedKeyword {
    /// Assigned by the store; `None` until persisted.
    pub id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    #[serde(flatten)]
    pub score: KeywordScore,
    pub collected_at: Option<DateTime<Utc>>,
    pub recommended_at: Option<DateTime<Utc>>,
    pub used: bool,
    /// Set once, when `used` first becomes true.
    pub used_at: Option<DateTime<Utc>>,
    pub feedback: Option<Feedback>,
}

impl RecommendedKeyword {
    /// Fresh, unsaved recommendation stamped at `now`.
    pub fn unsaved(score: KeywordScore, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            user_id: None,
            score,
            collected_at: Some(now),
            recommended_at: Some(now),
            used: false,
            used_at: None,
            feedback: None,
        }
    }

    pub fn keyword(&self) -> &str {
        &self.score.keyword
    }

    /// One-way transition to used. Returns false when already used.
    pub fn mark_used(&mut self, now: DateTime<Utc>) -> bool {
        if self.used {
            return false;
        }
        self.used = true;
        self.used_at = Some(now);
        true
    }
}

// =============================================================================
// OAUTH / ACCOUNTS
// =============================================================================

/// Google OAuth access token with its computed expiry.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: i64,
    pub token_type: String,
    pub scope: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl OAuthToken {
    /// A token with no known expiry is treated as live.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|at| at < now).unwrap_or(false)
    }
}

impl fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthToken")
            .field("access_token", &"[REDACTED]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[REDACTED]"),
            )
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Stored Blogger connection for a user (one per user).
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct BloggerAccount {
    pub id: Uuid,
    pub user_id: Uuid,
    pub blog_id: String,
    pub blog_name: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

impl fmt::Debug for BloggerAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BloggerAccount")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("blog_id", &self.blog_id)
            .field("blog_name", &self.blog_name)
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Kinds of third-party API keys a user can store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiKeyKind {
    GoogleApiKey,
    GoogleClientId,
    GoogleClientSecret,
    SunoApiKey,
    Context7ApiKey,
    OpenaiApiKey,
}

impl ApiKeyKind {
    pub const ALL: [ApiKeyKind; 6] = [
        Self::GoogleApiKey,
        Self::GoogleClientId,
        Self::GoogleClientSecret,
        Self::SunoApiKey,
        Self::Context7ApiKey,
        Self::OpenaiApiKey,
    ];

    /// Column name in `user_api_keys`.
    pub fn column(&self) -> &'static str {
        match self {
            Self::GoogleApiKey => "google_api_key",
            Self::GoogleClientId => "google_client_id",
            Self::GoogleClientSecret => "google_client_secret",
            Self::SunoApiKey => "suno_api_key",
            Self::Context7ApiKey => "context7_api_key",
            Self::OpenaiApiKey => "openai_api_key",
        }
    }
}

impl FromStr for ApiKeyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.column() == s)
            .ok_or_else(|| Error::InvalidArgument(format!("unknown API key type: {}", s)))
    }
}

/// Plaintext view of a user's stored API keys.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserApiKeys {
    pub google_api_key: Option<String>,
    pub google_client_id: Option<String>,
    pub google_client_secret: Option<String>,
    pub suno_api_key: Option<String>,
    pub context7_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserApiKeys {
    pub fn get(&self, kind: ApiKeyKind) -> Option<&str> {
        let value = match kind {
            ApiKeyKind::GoogleApiKey => &self.google_api_key,
            ApiKeyKind::GoogleClientId => &self.google_client_id,
            ApiKeyKind::GoogleClientSecret => &self.google_client_secret,
            ApiKeyKind::SunoApiKey => &self.suno_api_key,
            ApiKeyKind::Context7ApiKey => &self.context7_api_key,
            ApiKeyKind::OpenaiApiKey => &self.openai_api_key,
        };
        value.as_deref().filter(|v| !v.trim().is_empty())
    }

    pub fn set(&mut self, kind: ApiKeyKind, value: Option<String>) {
        let slot = match kind {
            ApiKeyKind::GoogleApiKey => &mut self.google_api_key,
            ApiKeyKind::GoogleClientId => &mut self.google_client_id,
            ApiKeyKind::GoogleClientSecret => &mut self.google_client_secret,
            ApiKeyKind::SunoApiKey => &mut self.suno_api_key,
            ApiKeyKind::Context7ApiKey => &mut self.context7_api_key,
            ApiKeyKind::OpenaiApiKey => &mut self.openai_api_key,
        };
        *slot = value;
    }
}

impl fmt::Debug for UserApiKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("UserApiKeys");
        for kind in ApiKeyKind::ALL {
            s.field(kind.column(), &self.get(kind).map(|_| "[REDACTED]"));
        }
        s.field("updated_at", &self.updated_at).finish()
    }
}

// =============================================================================
// SCHEDULING
// =============================================================================

/// Daily auto-publish configuration for one blog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub blog_id: String,
    pub enabled: bool,
    /// Local wall-clock publish time.
    pub publish_time: NaiveTime,
    /// IANA name or `±HH:MM` offset.
    pub timezone: String,
    pub keywords: Vec<String>,
    pub domain: String,
    /// Fully automatic generation mode.
    pub auto_generate: bool,
}

/// Publication state of a scheduled post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostStatus {
    Pending,
    Published,
    Failed,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Published => "published",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for PostStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "published" => Ok(Self::Published),
            "failed" => Ok(Self::Failed),
            other => Err(Error::InvalidArgument(format!("unknown post status: {}", other))),
        }
    }
}

/// A post queued for publication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledPost {
    pub id: Uuid,
    pub blog_id: String,
    pub scheduled_at: DateTime<Utc>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub keywords: Vec<String>,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
}
