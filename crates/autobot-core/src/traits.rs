//! Core traits for autobot abstractions.
//!
//! These traits define the seams between the pure keyword pipeline and its
//! external collaborators (metrics source, identity provider, relational
//! store), so concrete backends can be swapped and faked in tests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::defaults::LIST_LIMIT;
use crate::error::{Error, Result};
use crate::models::*;

// =============================================================================
// METRICS
// =============================================================================

/// Source of search-volume and competition estimates.
#[async_trait]
pub trait MetricsProvider: Send + Sync {
    /// Estimate metrics for one keyword.
    ///
    /// Empty keywords (after trimming) are rejected with `InvalidArgument`;
    /// a failing data source reports `UpstreamUnavailable`.
    async fn estimate(&self, keyword: &str) -> Result<EstimatedMetrics>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

// =============================================================================
// IDENTITY
// =============================================================================

/// Resolves the currently authenticated user.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `None` when no user is signed in.
    async fn current_user_id(&self) -> Result<Option<Uuid>>;
}

/// Resolve the current user or fail with `NotAuthenticated`.
pub async fn require_user(identity: &dyn IdentityProvider) -> Result<Uuid> {
    identity
        .current_user_id()
        .await?
        .ok_or_else(|| Error::NotAuthenticated("no authenticated user".to_string()))
}

/// Identity provider with a fixed answer (CLI sessions, tests).
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity {
    user_id: Option<Uuid>,
}

impl StaticIdentity {
    pub fn signed_in(user_id: Uuid) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    pub fn anonymous() -> Self {
        Self { user_id: None }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentity {
    async fn current_user_id(&self) -> Result<Option<Uuid>> {
        Ok(self.user_id)
    }
}

// =============================================================================
// RECOMMENDATION REPOSITORY
// =============================================================================

/// Filters for listing stored recommendations.
#[derive(Debug, Clone)]
pub struct ListRecommendationsRequest {
    /// Filter by used flag
    pub used: Option<bool>,
    /// Filter by tier
    pub recommendation: Option<Recommendation>,
    /// Maximum rows (default 50)
    pub limit: i64,
}

impl Default for ListRecommendationsRequest {
    fn default() -> Self {
        Self {
            used: None,
            recommendation: None,
            limit: LIST_LIMIT,
        }
    }
}

/// Persistence for recommended keywords, unique per (user, keyword).
#[async_trait]
pub trait RecommendedKeywordRepository: Send + Sync {
    /// Insert or refresh recommendations. Existing rows keep their id and
    /// used state; scores and timestamps are replaced.
    async fn upsert(
        &self,
        user_id: Uuid,
        recommendations: &[RecommendedKeyword],
    ) -> Result<Vec<RecommendedKeyword>>;

    /// List a user's recommendations ordered by final score, highest first.
    async fn list(
        &self,
        user_id: Uuid,
        req: ListRecommendationsRequest,
    ) -> Result<Vec<RecommendedKeyword>>;

    /// Mark a recommendation as used. Idempotent: `used_at` keeps its first
    /// value. Unknown ids fail with `NotFound`.
    async fn mark_used(&self, user_id: Uuid, id: Uuid) -> Result<RecommendedKeyword>;

    /// Record (or clear) feedback on a recommendation.
    async fn set_feedback(
        &self,
        user_id: Uuid,
        id: Uuid,
        feedback: Option<Feedback>,
    ) -> Result<RecommendedKeyword>;
}

// =============================================================================
// ACCOUNT / KEY REPOSITORIES
// =============================================================================

/// Storage for a user's Blogger OAuth connection.
#[async_trait]
pub trait BloggerAccountRepository: Send + Sync {
    /// Insert or replace the user's token row.
    async fn save_token(
        &self,
        user_id: Uuid,
        token: &OAuthToken,
        blog_id: &str,
        blog_name: &str,
    ) -> Result<BloggerAccount>;

    /// Update only the blog id/name of an existing row.
    async fn set_blog(&self, user_id: Uuid, blog_id: &str, blog_name: &str) -> Result<()>;

    async fn get(&self, user_id: Uuid) -> Result<Option<BloggerAccount>>;

    /// Remove the connection. Returns true when a row was deleted.
    async fn delete(&self, user_id: Uuid) -> Result<bool>;
}

/// Storage for a user's third-party API keys (plaintext at this seam).
#[async_trait]
pub trait ApiKeyRepository: Send + Sync {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserApiKeys>>;

    async fn save(&self, user_id: Uuid, keys: &UserApiKeys) -> Result<UserApiKeys>;
}

// =============================================================================
// SCHEDULE REPOSITORY
// =============================================================================

/// Request for queueing a post.
#[derive(Debug, Clone)]
pub struct CreateScheduledPostRequest {
    pub blog_id: String,
    pub scheduled_at: DateTime<Utc>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub keywords: Vec<String>,
}

/// Storage for publish schedules and queued posts.
#[async_trait]
pub trait ScheduleRepository: Send + Sync {
    /// Insert or replace the schedule for (user, blog).
    async fn save_config(&self, user_id: Uuid, config: &ScheduleConfig) -> Result<()>;

    async fn get_config(&self, user_id: Uuid, blog_id: &str) -> Result<Option<ScheduleConfig>>;

    async fn create_scheduled_post(
        &self,
        user_id: Uuid,
        req: CreateScheduledPostRequest,
    ) -> Result<ScheduledPost>;

    /// Pending posts scheduled at or before `now`, oldest first.
    async fn list_due(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Vec<ScheduledPost>>;

    async fn update_status(&self, user_id: Uuid, id: Uuid, status: PostStatus) -> Result<()>;
}
