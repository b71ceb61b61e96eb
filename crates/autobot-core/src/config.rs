//! Application configuration.
//!
//! Configuration is loaded from:
//! - A TOML file (`AUTOBOT_CONFIG`, default: `~/.config/autobot/config.toml`)
//! - Environment variables, which override file values
//!
//! # Example
//!
//! ```rust,no_run
//! use autobot_core::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load config");
//! println!("redirect: {}", config.google_redirect_uri);
//! ```

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::defaults;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

impl From<ConfigError> for crate::Error {
    fn from(e: ConfigError) -> Self {
        crate::Error::Config(e.to_string())
    }
}

/// Top-level autobot configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub database_max_connections: u32,
    /// How long to wait for a pooled connection.
    pub database_acquire_timeout_secs: u64,
    /// Passphrase the API-key sealing key is derived from.
    pub master_key: Option<String>,
    /// Deployment salt for the sealing key (any string, hashed to 32 bytes).
    pub key_salt: Option<String>,
    /// OAuth redirect URI registered with Google.
    pub google_redirect_uri: String,
    pub google_auth_url: String,
    pub google_token_url: String,
    pub blogger_api_url: String,
    /// Timeout for Google HTTP requests.
    pub http_timeout_secs: u64,
    /// Timezone used when a schedule has none.
    pub default_timezone: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            database_max_connections: defaults::DATABASE_MAX_CONNECTIONS,
            database_acquire_timeout_secs: defaults::DATABASE_ACQUIRE_TIMEOUT_SECS,
            master_key: None,
            key_salt: None,
            google_redirect_uri: "http://localhost:5173/blogger/oauth/callback".to_string(),
            google_auth_url: defaults::GOOGLE_AUTH_URL.to_string(),
            google_token_url: defaults::GOOGLE_TOKEN_URL.to_string(),
            blogger_api_url: defaults::BLOGGER_API_URL.to_string(),
            http_timeout_secs: defaults::HTTP_TIMEOUT_SECS,
            default_timezone: defaults::SCHEDULE_TIMEZONE.to_string(),
        }
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("database_url", &self.database_url.as_ref().map(|_| "[SET]"))
            .field("database_max_connections", &self.database_max_connections)
            .field(
                "database_acquire_timeout_secs",
                &self.database_acquire_timeout_secs,
            )
            .field("master_key", &self.master_key.as_ref().map(|_| "[REDACTED]"))
            .field("key_salt", &self.key_salt.as_ref().map(|_| "[SET]"))
            .field("google_redirect_uri", &self.google_redirect_uri)
            .field("google_auth_url", &self.google_auth_url)
            .field("google_token_url", &self.google_token_url)
            .field("blogger_api_url", &self.blogger_api_url)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("default_timezone", &self.default_timezone)
            .finish()
    }
}

impl AppConfig {
    /// Default config file location.
    pub fn default_path() -> Option<PathBuf> {
        env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".config/autobot/config.toml"))
    }

    /// Load from the configured file (if present), then apply environment
    /// overrides and validate.
    pub fn load() -> ConfigResult<Self> {
        let path = env::var("AUTOBOT_CONFIG")
            .ok()
            .map(PathBuf::from)
            .or_else(Self::default_path);

        let mut config = match path {
            Some(ref p) if p.exists() => Self::from_file(p)?,
            _ => {
                debug!("No config file found, using defaults");
                Self::default()
            }
        };

        config.apply_env();
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML file. Missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env();
        config
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|name| env::var(name).ok());
    }

    /// Apply overrides from any variable lookup.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("DATABASE_URL") {
            self.database_url = Some(v);
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS").and_then(|s| s.parse().ok()) {
            self.database_max_connections = v;
        }
        if let Some(v) = lookup("DATABASE_ACQUIRE_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.database_acquire_timeout_secs = v;
        }
        if let Some(v) = lookup("AUTOBOT_MASTER_KEY") {
            self.master_key = Some(v);
        }
        if let Some(v) = lookup("AUTOBOT_KEY_SALT") {
            self.key_salt = Some(v);
        }
        if let Some(v) = lookup("GOOGLE_REDIRECT_URI") {
            self.google_redirect_uri = v;
        }
        if let Some(v) = lookup("GOOGLE_AUTH_URL") {
            self.google_auth_url = v;
        }
        if let Some(v) = lookup("GOOGLE_TOKEN_URL") {
            self.google_token_url = v;
        }
        if let Some(v) = lookup("BLOGGER_API_URL") {
            self.blogger_api_url = v;
        }
        if let Some(v) = lookup("HTTP_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            self.http_timeout_secs = v;
        }
        if let Some(v) = lookup("AUTOBOT_DEFAULT_TIMEZONE") {
            self.default_timezone = v;
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        for (name, url) in [
            ("google_redirect_uri", &self.google_redirect_uri),
            ("google_auth_url", &self.google_auth_url),
            ("google_token_url", &self.google_token_url),
            ("blogger_api_url", &self.blogger_api_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "{} must start with http:// or https://, got: {}",
                    name, url
                )));
            }
        }

        if self.http_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "http_timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.database_max_connections == 0 {
            return Err(ConfigError::Validation(
                "database_max_connections must be greater than zero".to_string(),
            ));
        }

        if self.default_timezone.trim().is_empty() {
            return Err(ConfigError::Validation(
                "default_timezone cannot be empty".to_string(),
            ));
        }

        if let Some(ref key) = self.master_key {
            if key.is_empty() {
                return Err(ConfigError::Validation(
                    "master_key cannot be empty when set".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.http_timeout_secs, 30);
        assert_eq!(config.default_timezone, "Asia/Seoul");
    }

    #[test]
    fn test_overrides_applied() {
        let vars: HashMap<&str, &str> = [
            ("DATABASE_URL", "postgres://localhost/autobot"),
            ("HTTP_TIMEOUT_SECS", "5"),
            ("BLOGGER_API_URL", "http://127.0.0.1:9000"),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_overrides(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://localhost/autobot")
        );
        assert_eq!(config.http_timeout_secs, 5);
        assert_eq!(config.blogger_api_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_database_pool_overrides() {
        let mut config = AppConfig::default();
        assert_eq!(config.database_max_connections, 5);
        config.apply_overrides(|k| match k {
            "DATABASE_MAX_CONNECTIONS" => Some("12".to_string()),
            "DATABASE_ACQUIRE_TIMEOUT_SECS" => Some("3".to_string()),
            _ => None,
        });
        assert_eq!(config.database_max_connections, 12);
        assert_eq!(config.database_acquire_timeout_secs, 3);

        config.database_max_connections = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unparseable_timeout_ignored() {
        let mut config = AppConfig::default();
        config.apply_overrides(|k| (k == "HTTP_TIMEOUT_SECS").then(|| "soon".to_string()));
        assert_eq!(config.http_timeout_secs, 30);
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let config = AppConfig {
            blogger_api_url: "ftp://example.com".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = AppConfig {
            http_timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "http_timeout_secs = 12").unwrap();
        writeln!(file, "default_timezone = \"UTC\"").unwrap();

        let config = AppConfig::from_file(file.path()).unwrap();
        assert_eq!(config.http_timeout_secs, 12);
        assert_eq!(config.default_timezone, "UTC");
        assert_eq!(config.google_token_url, defaults::GOOGLE_TOKEN_URL);
    }

    #[test]
    fn test_from_file_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "http_timeout_secs = = 12").unwrap();
        assert!(matches!(
            AppConfig::from_file(file.path()),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_debug_redacts_master_key() {
        let config = AppConfig {
            master_key: Some("super-secret-passphrase".to_string()),
            ..Default::default()
        };
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-passphrase"));
    }
}
