//! PostgreSQL pool construction.
//!
//! Pool sizing and timeouts come from the `database_*` settings of
//! [`AppConfig`], so file and environment overrides reach the pool.

use std::time::{Duration, Instant};

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

use autobot_core::{AppConfig, Error, Result};

/// Idle connections are closed after ten minutes.
const IDLE_TIMEOUT: Duration = Duration::from_secs(600);

/// Pool sizing and timeouts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
}

impl PoolConfig {
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            max_connections: config.database_max_connections.max(1),
            acquire_timeout: Duration::from_secs(config.database_acquire_timeout_secs),
            idle_timeout: IDLE_TIMEOUT,
        }
    }

    /// Override the connection cap (at least one connection is kept).
    pub fn with_max_connections(mut self, n: u32) -> Self {
        self.max_connections = n.max(1);
        self
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::from_app_config(&AppConfig::default())
    }
}

/// Open a pool against `database_url`.
pub async fn connect_pool(database_url: &str, config: &PoolConfig) -> Result<PgPool> {
    let start = Instant::now();

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(config.idle_timeout)
        .connect(database_url)
        .await
        .map_err(Error::Database)?;

    info!(
        subsystem = "database",
        component = "pool",
        op = "connect",
        max_connections = config.max_connections,
        duration_ms = start.elapsed().as_millis() as u64,
        "Database connection pool established"
    );
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pool_config_follows_app_config() {
        let app = AppConfig {
            database_max_connections: 12,
            database_acquire_timeout_secs: 4,
            ..Default::default()
        };
        let config = PoolConfig::from_app_config(&app);
        assert_eq!(config.max_connections, 12);
        assert_eq!(config.acquire_timeout, Duration::from_secs(4));
        assert_eq!(config.idle_timeout, IDLE_TIMEOUT);
    }

    #[test]
    fn test_default_matches_app_defaults() {
        let config = PoolConfig::default();
        assert_eq!(
            config.max_connections,
            autobot_core::defaults::DATABASE_MAX_CONNECTIONS
        );
    }

    #[test]
    fn test_connection_cap_never_zero() {
        assert_eq!(PoolConfig::default().with_max_connections(0).max_connections, 1);
        let app = AppConfig {
            database_max_connections: 0,
            ..Default::default()
        };
        assert_eq!(PoolConfig::from_app_config(&app).max_connections, 1);
    }
}
