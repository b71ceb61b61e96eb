//! User API key repository. Values are sealed before they reach the table.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Pool, Postgres, Row};
use tracing::debug;
use uuid::Uuid;

use autobot_core::{ApiKeyKind, ApiKeyRepository, Error, Result, UserApiKeys};
use autobot_crypto::SecretBox;

/// PostgreSQL API key repository with at-rest sealing.
pub struct PgApiKeyRepository {
    pool: Pool<Postgres>,
    secrets: Arc<SecretBox>,
}

impl PgApiKeyRepository {
    pub fn new(pool: Pool<Postgres>, secrets: Arc<SecretBox>) -> Self {
        Self { pool, secrets }
    }

    fn seal(&self, value: Option<&str>) -> Result<Option<String>> {
        match value {
            Some(v) => Ok(Some(self.secrets.seal(v)?)),
            None => Ok(None),
        }
    }

    fn open(&self, value: Option<String>) -> Result<Option<String>> {
        match value.filter(|v| !v.is_empty()) {
            Some(v) => Ok(Some(self.secrets.open(&v)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl ApiKeyRepository for PgApiKeyRepository {
    async fn get(&self, user_id: Uuid) -> Result<Option<UserApiKeys>> {
        let row = sqlx::query(
            "SELECT google_api_key, google_client_id, google_client_secret,
                    suno_api_key, context7_api_key, openai_api_key, updated_at
             FROM user_api_keys WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut keys = UserApiKeys {
            updated_at: row.get("updated_at"),
            ..Default::default()
        };
        for kind in ApiKeyKind::ALL {
            let sealed: Option<String> = row.get(kind.column());
            keys.set(kind, self.open(sealed)?);
        }
        Ok(Some(keys))
    }

    async fn save(&self, user_id: Uuid, keys: &UserApiKeys) -> Result<UserApiKeys> {
        let now = Utc::now();
        let mut query = sqlx::query(
            "INSERT INTO user_api_keys
                (user_id, google_api_key, google_client_id, google_client_secret,
                 suno_api_key, context7_api_key, openai_api_key, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             ON CONFLICT (user_id) DO UPDATE SET
                google_api_key = EXCLUDED.google_api_key,
                google_client_id = EXCLUDED.google_client_id,
                google_client_secret = EXCLUDED.google_client_secret,
                suno_api_key = EXCLUDED.suno_api_key,
                context7_api_key = EXCLUDED.context7_api_key,
                openai_api_key = EXCLUDED.openai_api_key,
                updated_at = EXCLUDED.updated_at",
        )
        .bind(user_id);

        let mut stored = UserApiKeys {
            updated_at: Some(now),
            ..Default::default()
        };
        for kind in ApiKeyKind::ALL {
            let value = keys.get(kind).map(str::trim);
            query = query.bind(self.seal(value)?);
            stored.set(kind, value.map(str::to_string));
        }

        query
            .bind(now)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "api_keys",
            op = "save",
            %user_id,
            stored_count = ApiKeyKind::ALL.iter().filter(|k| stored.get(**k).is_some()).count(),
            "Saved API keys"
        );
        Ok(stored)
    }
}
