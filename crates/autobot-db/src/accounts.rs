//! Blogger account (OAuth connection) repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use autobot_core::{BloggerAccount, BloggerAccountRepository, Error, OAuthToken, Result};

/// PostgreSQL Blogger account repository.
pub struct PgBloggerAccountRepository {
    pool: Pool<Postgres>,
}

impl PgBloggerAccountRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn parse_row(row: &PgRow) -> BloggerAccount {
        BloggerAccount {
            id: row.get("id"),
            user_id: row.get("user_id"),
            blog_id: row.get("blog_id"),
            blog_name: row.get("blog_name"),
            access_token: row.get("access_token"),
            refresh_token: row.get("refresh_token"),
            expires_at: row.get("expires_at"),
            updated_at: row.get("updated_at"),
        }
    }
}

#[async_trait]
impl BloggerAccountRepository for PgBloggerAccountRepository {
    async fn save_token(
        &self,
        user_id: Uuid,
        token: &OAuthToken,
        blog_id: &str,
        blog_name: &str,
    ) -> Result<BloggerAccount> {
        let row = sqlx::query(
            "INSERT INTO blogger_accounts
                (id, user_id, blog_id, blog_name, access_token, refresh_token, expires_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (user_id) DO UPDATE SET
                blog_id = EXCLUDED.blog_id,
                blog_name = EXCLUDED.blog_name,
                access_token = EXCLUDED.access_token,
                refresh_token = EXCLUDED.refresh_token,
                expires_at = EXCLUDED.expires_at,
                updated_at = EXCLUDED.updated_at
             RETURNING id, user_id, blog_id, blog_name, access_token, refresh_token,
                       expires_at, updated_at",
        )
        .bind(Uuid::now_v7())
        .bind(user_id)
        .bind(blog_id)
        .bind(blog_name)
        .bind(&token.access_token)
        .bind(&token.refresh_token)
        .bind(token.expires_at)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "accounts",
            op = "save_token",
            %user_id,
            "Saved Blogger token"
        );
        Ok(Self::parse_row(&row))
    }

    async fn set_blog(&self, user_id: Uuid, blog_id: &str, blog_name: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE blogger_accounts SET blog_id = $2, blog_name = $3, updated_at = $4
             WHERE user_id = $1",
        )
        .bind(user_id)
        .bind(blog_id)
        .bind(blog_name)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::NotFound(format!("Blogger account for user {}", user_id)));
        }
        Ok(())
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<BloggerAccount>> {
        let row = sqlx::query(
            "SELECT id, user_id, blog_id, blog_name, access_token, refresh_token,
                    expires_at, updated_at
             FROM blogger_accounts WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(row.as_ref().map(Self::parse_row))
    }

    async fn delete(&self, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM blogger_accounts WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }
}
