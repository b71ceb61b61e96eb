//! # autobot-db
//!
//! Persistence layer for autobot.
//!
//! This crate provides:
//! - Connection pool management
//! - PostgreSQL repositories for recommended keywords, Blogger accounts,
//!   sealed API keys, and publish schedules
//! - In-memory repositories with the same contracts
//! - Schema migrations (`migrations` feature)
//!
//! ## Example
//!
//! ```rust,ignore
//! use autobot_db::Database;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/autobot").await?;
//!     db.migrate().await?;
//!     Ok(())
//! }
//! ```

pub mod accounts;
pub mod api_keys;
pub mod memory;
pub mod pool;
pub mod recommendations;
pub mod schedules;

// Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

use std::sync::Arc;

use autobot_core::{AppConfig, Error, Result};
use autobot_crypto::SecretBox;

pub use accounts::PgBloggerAccountRepository;
pub use api_keys::PgApiKeyRepository;
pub use memory::{
    InMemoryApiKeyRepository, InMemoryBloggerAccountRepository,
    InMemoryRecommendedKeywordRepository, InMemoryScheduleRepository,
};
pub use pool::{connect_pool, PoolConfig};
pub use recommendations::PgRecommendedKeywordRepository;
pub use schedules::PgScheduleRepository;

/// Combined database context with all repositories.
pub struct Database {
    pub pool: sqlx::Pool<sqlx::Postgres>,
    pub recommendations: Arc<PgRecommendedKeywordRepository>,
    pub accounts: Arc<PgBloggerAccountRepository>,
    pub schedules: Arc<PgScheduleRepository>,
    /// Requires a sealing key; see [`Database::with_secrets`].
    pub api_keys: Option<Arc<PgApiKeyRepository>>,
}

impl Database {
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            recommendations: Arc::new(PgRecommendedKeywordRepository::new(pool.clone())),
            accounts: Arc::new(PgBloggerAccountRepository::new(pool.clone())),
            schedules: Arc::new(PgScheduleRepository::new(pool.clone())),
            api_keys: None,
            pool,
        }
    }

    /// Enable the API key repository with the given sealing key.
    pub fn with_secrets(mut self, secrets: Arc<SecretBox>) -> Self {
        self.api_keys = Some(Arc::new(PgApiKeyRepository::new(
            self.pool.clone(),
            secrets,
        )));
        self
    }

    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_config(url, PoolConfig::default()).await
    }

    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = connect_pool(url, &config).await?;
        Ok(Self::new(pool))
    }

    /// Connect using the application config. API key storage is enabled
    /// when a master key is configured.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let url = config
            .database_url
            .as_deref()
            .ok_or_else(|| Error::Config("DATABASE_URL is not set".to_string()))?;

        let db = Self::connect_with_config(url, PoolConfig::from_app_config(config)).await?;
        match config.master_key.as_deref() {
            Some(master) => {
                let secrets = SecretBox::from_master_key(master, config.key_salt.as_deref())?;
                Ok(db.with_secrets(Arc::new(secrets)))
            }
            None => Ok(db),
        }
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// API key repository, or a configuration error when no sealing key is set.
    pub fn api_keys(&self) -> Result<Arc<PgApiKeyRepository>> {
        self.api_keys.clone().ok_or_else(|| {
            Error::Config("AUTOBOT_MASTER_KEY is required to store API keys".to_string())
        })
    }

    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
