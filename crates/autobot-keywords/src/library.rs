//! Per-user keyword library: persisted recommendations for the signed-in user.

use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use autobot_core::{
    require_user, Feedback, IdentityProvider, ListRecommendationsRequest, RecommendedKeyword,
    RecommendedKeywordRepository, Result,
};

/// Persistence front for recommendations, scoped to the current user.
///
/// Every call resolves the user through the identity provider first and
/// fails with `NotAuthenticated` when nobody is signed in.
#[derive(Clone)]
pub struct KeywordLibrary {
    repo: Arc<dyn RecommendedKeywordRepository>,
    identity: Arc<dyn IdentityProvider>,
}

impl KeywordLibrary {
    pub fn new(
        repo: Arc<dyn RecommendedKeywordRepository>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self { repo, identity }
    }

    /// Upsert recommendations for the current user.
    #[instrument(skip(self, recommendations), fields(
        subsystem = "keywords",
        component = "library",
        op = "save",
        count = recommendations.len(),
    ))]
    pub async fn save(
        &self,
        recommendations: &[RecommendedKeyword],
    ) -> Result<Vec<RecommendedKeyword>> {
        let user_id = require_user(self.identity.as_ref()).await?;
        if recommendations.is_empty() {
            debug!(%user_id, "Nothing to save");
            return Ok(Vec::new());
        }

        let saved = self.repo.upsert(user_id, recommendations).await?;
        info!(%user_id, result_count = saved.len(), "Saved keyword recommendations");
        Ok(saved)
    }

    pub async fn list(&self, req: ListRecommendationsRequest) -> Result<Vec<RecommendedKeyword>> {
        let user_id = require_user(self.identity.as_ref()).await?;
        self.repo.list(user_id, req).await
    }

    /// Mark a stored recommendation as used. Marking twice is a no-op.
    pub async fn mark_used(&self, id: Uuid) -> Result<RecommendedKeyword> {
        let user_id = require_user(self.identity.as_ref()).await?;
        let rec = self.repo.mark_used(user_id, id).await?;
        debug!(%user_id, keyword_id = %id, "Marked keyword as used");
        Ok(rec)
    }

    pub async fn set_feedback(
        &self,
        id: Uuid,
        feedback: Option<Feedback>,
    ) -> Result<RecommendedKeyword> {
        let user_id = require_user(self.identity.as_ref()).await?;
        self.repo.set_feedback(user_id, id, feedback).await
    }
}
