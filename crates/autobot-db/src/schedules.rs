//! Publish schedule and scheduled post repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use uuid::Uuid;

use autobot_core::{
    CreateScheduledPostRequest, Error, PostStatus, Result, ScheduleConfig, ScheduleRepository,
    ScheduledPost,
};

/// PostgreSQL schedule repository.
pub struct PgScheduleRepository {
    pool: Pool<Postgres>,
}

impl PgScheduleRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_post(row: &PgRow) -> Result<ScheduledPost> {
        let status: String = row.get("status");
        Ok(ScheduledPost {
            id: row.get("id"),
            blog_id: row.get("blog_id"),
            scheduled_at: row.get("scheduled_at"),
            title: row.get("title"),
            content: row.get("content"),
            keywords: row.get("keywords"),
            status: status.parse()?,
            created_at: row.get("created_at"),
        })
    }
}

#[async_trait]
impl ScheduleRepository for PgScheduleRepository {
    async fn save_config(&self, user_id: Uuid, config: &ScheduleConfig) -> Result<()> {
        sqlx::query(
            "INSERT INTO blog_schedules
                (id, user_id, blog_id, enabled, publish_time, timezone, keywords, domain,
                 auto_generate, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             ON CONFLICT (user_id, blog_id) DO UPDATE SET
                enabled = EXCLUDED.enabled,
                publish_time = EXCLUDED.publish_time,
                timezone = EXCLUDED.timezone,
                keywords = EXCLUDED.keywords,
                domain = EXCLUDED.domain,
                auto_generate = EXCLUDED.auto_generate,
                updated_at = EXCLUDED.updated_at",
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(&config.blog_id)
        .bind(config.enabled)
        .bind(config.publish_time)
        .bind(&config.timezone)
        .bind(&config.keywords)
        .bind(&config.domain)
        .bind(config.auto_generate)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;
        Ok(())
    }

    async fn get_config(&self, user_id: Uuid, blog_id: &str) -> Result<Option<ScheduleConfig>> {
        let row = sqlx::query(
            "SELECT blog_id, enabled, publish_time, timezone, keywords, domain, auto_generate
             FROM blog_schedules WHERE user_id = $1 AND blog_id = $2",
        )
        .bind(user_id)
        .bind(blog_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.map(|r| ScheduleConfig {
            blog_id: r.get("blog_id"),
            enabled: r.get("enabled"),
            publish_time: r.get("publish_time"),
            timezone: r.get("timezone"),
            keywords: r.get("keywords"),
            domain: r.get("domain"),
            auto_generate: r.get("auto_generate"),
        }))
    }

    async fn create_scheduled_post(
        &self,
        user_id: Uuid,
        req: CreateScheduledPostRequest,
    ) -> Result<ScheduledPost> {
        let row = sqlx::query(
            "INSERT INTO scheduled_posts
                (id, user_id, blog_id, scheduled_at, title, content, keywords, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, 'pending', $8)
             RETURNING id, blog_id, scheduled_at, title, content, keywords, status, created_at",
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(&req.blog_id)
        .bind(req.scheduled_at)
        .bind(&req.title)
        .bind(&req.content)
        .bind(&req.keywords)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        Self::parse_post(&row)
    }

    async fn list_due(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Vec<ScheduledPost>> {
        let rows = sqlx::query(
            "SELECT id, blog_id, scheduled_at, title, content, keywords, status, created_at
             FROM scheduled_posts
             WHERE user_id = $1 AND status = 'pending' AND scheduled_at <= $2
             ORDER BY scheduled_at ASC",
        )
        .bind(user_id)
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        rows.iter().map(Self::parse_post).collect()
    }

    async fn update_status(&self, user_id: Uuid, id: Uuid, status: PostStatus) -> Result<()> {
        let result =
            sqlx::query("UPDATE scheduled_posts SET status = $3 WHERE id = $1 AND user_id = $2")
                .bind(id)
                .bind(user_id)
                .bind(status.as_str())
                .execute(&self.pool)
                .await
                .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("scheduled post {}", id)));
        }
        Ok(())
    }
}
