//! In-memory repositories.
//!
//! Same contracts as the PostgreSQL repositories, held behind a
//! `tokio::sync::RwLock`. Used by the CLI when no database is configured and
//! by tests that exercise services without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use autobot_core::{
    ApiKeyKind, ApiKeyRepository, BloggerAccount, BloggerAccountRepository,
    CreateScheduledPostRequest, Error, Feedback, ListRecommendationsRequest, OAuthToken,
    PostStatus, RecommendedKeyword, RecommendedKeywordRepository, Result, ScheduleConfig,
    ScheduleRepository, ScheduledPost, UserApiKeys,
};

fn not_found_keyword(id: Uuid) -> Error {
    Error::NotFound(format!("recommended keyword {}", id))
}

// =============================================================================
// RECOMMENDATIONS
// =============================================================================

#[derive(Default)]
pub struct InMemoryRecommendedKeywordRepository {
    rows: RwLock<Vec<RecommendedKeyword>>,
}

impl InMemoryRecommendedKeywordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl RecommendedKeywordRepository for InMemoryRecommendedKeywordRepository {
    async fn upsert(
        &self,
        user_id: Uuid,
        recommendations: &[RecommendedKeyword],
    ) -> Result<Vec<RecommendedKeyword>> {
        let now = Utc::now();
        let mut rows = self.rows.write().await;
        let mut saved = Vec::with_capacity(recommendations.len());

        for rec in recommendations {
            let existing = rows
                .iter_mut()
                .find(|r| r.user_id == Some(user_id) && r.keyword() == rec.keyword());

            let stored = match existing {
                Some(row) => {
                    row.score = rec.score.clone();
                    row.collected_at = Some(rec.collected_at.unwrap_or(now));
                    row.recommended_at = Some(rec.recommended_at.unwrap_or(now));
                    row.clone()
                }
                None => {
                    let row = RecommendedKeyword {
                        id: Some(Uuid::now_v7()),
                        user_id: Some(user_id),
                        score: rec.score.clone(),
                        collected_at: Some(rec.collected_at.unwrap_or(now)),
                        recommended_at: Some(rec.recommended_at.unwrap_or(now)),
                        used: false,
                        used_at: None,
                        feedback: None,
                    };
                    rows.push(row.clone());
                    row
                }
            };
            saved.push(stored);
        }
        Ok(saved)
    }

    async fn list(
        &self,
        user_id: Uuid,
        req: ListRecommendationsRequest,
    ) -> Result<Vec<RecommendedKeyword>> {
        let rows = self.rows.read().await;
        let mut matching: Vec<RecommendedKeyword> = rows
            .iter()
            .filter(|r| r.user_id == Some(user_id))
            .filter(|r| req.used.map(|u| r.used == u).unwrap_or(true))
            .filter(|r| {
                req.recommendation
                    .map(|t| r.score.recommendation == t)
                    .unwrap_or(true)
            })
            .cloned()
            .collect();

        matching.sort_by(|a, b| {
            b.score
                .final_score
                .partial_cmp(&a.score.final_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.keyword().cmp(b.keyword()))
        });
        matching.truncate(req.limit.max(0) as usize);
        Ok(matching)
    }

    async fn mark_used(&self, user_id: Uuid, id: Uuid) -> Result<RecommendedKeyword> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|r| r.id == Some(id) && r.user_id == Some(user_id))
            .ok_or_else(|| not_found_keyword(id))?;
        row.mark_used(Utc::now());
        Ok(row.clone())
    }

    async fn set_feedback(
        &self,
        user_id: Uuid,
        id: Uuid,
        feedback: Option<Feedback>,
    ) -> Result<RecommendedKeyword> {
        let mut rows = self.rows.write().await;
        let row = rows
            .iter_mut()
            .find(|r| r.id == Some(id) && r.user_id == Some(user_id))
            .ok_or_else(|| not_found_keyword(id))?;
        row.feedback = feedback;
        Ok(row.clone())
    }
}

// =============================================================================
// BLOGGER ACCOUNTS
// =============================================================================

#[derive(Default)]
pub struct InMemoryBloggerAccountRepository {
    accounts: RwLock<HashMap<Uuid, BloggerAccount>>,
}

impl InMemoryBloggerAccountRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BloggerAccountRepository for InMemoryBloggerAccountRepository {
    async fn save_token(
        &self,
        user_id: Uuid,
        token: &OAuthToken,
        blog_id: &str,
        blog_name: &str,
    ) -> Result<BloggerAccount> {
        let mut accounts = self.accounts.write().await;
        let id = accounts
            .get(&user_id)
            .map(|a| a.id)
            .unwrap_or_else(Uuid::now_v7);

        let account = BloggerAccount {
            id,
            user_id,
            blog_id: blog_id.to_string(),
            blog_name: blog_name.to_string(),
            access_token: token.access_token.clone(),
            refresh_token: token.refresh_token.clone(),
            expires_at: token.expires_at,
            updated_at: Utc::now(),
        };
        accounts.insert(user_id, account.clone());
        Ok(account)
    }

    async fn set_blog(&self, user_id: Uuid, blog_id: &str, blog_name: &str) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        let account = accounts
            .get_mut(&user_id)
            .ok_or_else(|| Error::NotFound(format!("Blogger account for user {}", user_id)))?;
        account.blog_id = blog_id.to_string();
        account.blog_name = blog_name.to_string();
        account.updated_at = Utc::now();
        Ok(())
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<BloggerAccount>> {
        Ok(self.accounts.read().await.get(&user_id).cloned())
    }

    async fn delete(&self, user_id: Uuid) -> Result<bool> {
        Ok(self.accounts.write().await.remove(&user_id).is_some())
    }
}

// =============================================================================
// API KEYS
// =============================================================================

#[derive(Default)]
pub struct InMemoryApiKeyRepository {
    keys: RwLock<HashMap<Uuid, UserApiKeys>>,
}

impl InMemoryApiKeyRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ApiKeyRepository for InMemoryApiKeyRepository {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserApiKeys>> {
        Ok(self.keys.read().await.get(&user_id).cloned())
    }

    async fn save(&self, user_id: Uuid, keys: &UserApiKeys) -> Result<UserApiKeys> {
        let mut stored = UserApiKeys {
            updated_at: Some(Utc::now()),
            ..Default::default()
        };
        for kind in ApiKeyKind::ALL {
            stored.set(kind, keys.get(kind).map(|v| v.trim().to_string()));
        }
        self.keys.write().await.insert(user_id, stored.clone());
        Ok(stored)
    }
}

// =============================================================================
// SCHEDULES
// =============================================================================

#[derive(Default)]
pub struct InMemoryScheduleRepository {
    configs: RwLock<HashMap<(Uuid, String), ScheduleConfig>>,
    posts: RwLock<Vec<(Uuid, ScheduledPost)>>,
}

impl InMemoryScheduleRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScheduleRepository for InMemoryScheduleRepository {
    async fn save_config(&self, user_id: Uuid, config: &ScheduleConfig) -> Result<()> {
        self.configs
            .write()
            .await
            .insert((user_id, config.blog_id.clone()), config.clone());
        Ok(())
    }

    async fn get_config(&self, user_id: Uuid, blog_id: &str) -> Result<Option<ScheduleConfig>> {
        Ok(self
            .configs
            .read()
            .await
            .get(&(user_id, blog_id.to_string()))
            .cloned())
    }

    async fn create_scheduled_post(
        &self,
        user_id: Uuid,
        req: CreateScheduledPostRequest,
    ) -> Result<ScheduledPost> {
        let post = ScheduledPost {
            id: Uuid::now_v7(),
            blog_id: req.blog_id,
            scheduled_at: req.scheduled_at,
            title: req.title,
            content: req.content,
            keywords: req.keywords,
            status: PostStatus::Pending,
            created_at: Utc::now(),
        };
        self.posts.write().await.push((user_id, post.clone()));
        Ok(post)
    }

    async fn list_due(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Vec<ScheduledPost>> {
        let posts = self.posts.read().await;
        let mut due: Vec<ScheduledPost> = posts
            .iter()
            .filter(|(owner, p)| {
                *owner == user_id && p.status == PostStatus::Pending && p.scheduled_at <= now
            })
            .map(|(_, p)| p.clone())
            .collect();
        due.sort_by_key(|p| p.scheduled_at);
        Ok(due)
    }

    async fn update_status(&self, user_id: Uuid, id: Uuid, status: PostStatus) -> Result<()> {
        let mut posts = self.posts.write().await;
        let (_, post) = posts
            .iter_mut()
            .find(|(owner, p)| *owner == user_id && p.id == id)
            .ok_or_else(|| Error::NotFound(format!("scheduled post {}", id)))?;
        post.status = status;
        Ok(())
    }
}
