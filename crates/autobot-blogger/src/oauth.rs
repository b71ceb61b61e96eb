//! Google OAuth 2.0 authorization-code client for Blogger access.

use std::time::{Duration, Instant};

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use autobot_core::defaults::{BLOGGER_SCOPE, TOKEN_DEFAULT_EXPIRES_IN_SECS};
use autobot_core::{AppConfig, Error, OAuthToken, Result, UserApiKeys};

use crate::http::error_message;

/// Client credentials and endpoints for the OAuth flow.
#[derive(Clone)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for OAuthClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthClientConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("redirect_uri", &self.redirect_uri)
            .field("auth_url", &self.auth_url)
            .field("token_url", &self.token_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OAuthClientConfig {
    /// Build from the user's stored client credentials and deployment config.
    pub fn from_keys(keys: &UserApiKeys, config: &AppConfig) -> Result<Self> {
        let client_id = keys.google_client_id.as_deref().filter(|v| !v.is_empty());
        let client_secret = keys
            .google_client_secret
            .as_deref()
            .filter(|v| !v.is_empty());

        let (Some(client_id), Some(client_secret)) = (client_id, client_secret) else {
            return Err(Error::InvalidArgument(
                "Google Client ID and Client Secret must be configured".to_string(),
            ));
        };

        Ok(Self {
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            redirect_uri: config.google_redirect_uri.clone(),
            auth_url: config.google_auth_url.clone(),
            token_url: config.google_token_url.clone(),
            timeout: Duration::from_secs(config.http_timeout_secs),
        })
    }
}

/// Consent URL plus the CSRF state the callback must echo back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

/// Raw token endpoint response.
#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    token_type: Option<String>,
    scope: Option<String>,
}

impl TokenResponse {
    fn into_token(self) -> OAuthToken {
        let expires_in = self.expires_in.unwrap_or(TOKEN_DEFAULT_EXPIRES_IN_SECS);
        OAuthToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token.filter(|t| !t.is_empty()),
            expires_in,
            token_type: self.token_type.unwrap_or_else(|| "Bearer".to_string()),
            scope: self.scope,
            expires_at: Some(Utc::now() + chrono::Duration::seconds(expires_in)),
        }
    }
}

/// Google OAuth client.
pub struct GoogleOAuthClient {
    config: OAuthClientConfig,
    client: reqwest::Client,
}

impl GoogleOAuthClient {
    pub fn new(config: OAuthClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &OAuthClientConfig {
        &self.config
    }

    /// Consent URL requesting offline Blogger access with a fresh state.
    pub fn authorization_url(&self) -> AuthorizationRequest {
        let state = Uuid::new_v4().to_string();
        let params = [
            ("client_id", self.config.client_id.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", BLOGGER_SCOPE),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", state.as_str()),
        ];
        let query: Vec<String> = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect();

        AuthorizationRequest {
            url: format!("{}?{}", self.config.auth_url, query.join("&")),
            state,
        }
    }

    /// Exchange an authorization code for tokens.
    #[instrument(skip(self, code), fields(subsystem = "blogger", component = "oauth", op = "exchange_code"))]
    pub async fn exchange_code(&self, code: &str) -> Result<OAuthToken> {
        if code.trim().is_empty() {
            return Err(Error::InvalidArgument(
                "authorization code must not be empty".to_string(),
            ));
        }

        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        let token = self.request_token(&form, "token exchange").await?;
        info!(has_refresh_token = token.refresh_token.is_some(), "Exchanged authorization code");
        Ok(token)
    }

    /// Obtain a new access token from a refresh token.
    #[instrument(skip(self, refresh_token), fields(subsystem = "blogger", component = "oauth", op = "refresh"))]
    pub async fn refresh(&self, refresh_token: &str) -> Result<OAuthToken> {
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ];
        self.request_token(&form, "token refresh").await
    }

    async fn request_token(&self, form: &[(&str, &str)], context: &str) -> Result<OAuthToken> {
        let start = Instant::now();
        let response = self
            .client
            .post(&self.config.token_url)
            .form(form)
            .send()
            .await
            .map_err(|e| Error::UpstreamUnavailable(format!("{} failed: {}", context, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let code = error_message(&body).unwrap_or_else(|| status.to_string());
            warn!(http_status = status.as_u16(), error = %code, "{} rejected", context);
            return Err(Error::UpstreamUnavailable(format!(
                "{} failed: {}",
                context, code
            )));
        }

        let parsed: TokenResponse = response.json().await.map_err(|e| {
            Error::UpstreamUnavailable(format!("{}: invalid token response: {}", context, e))
        })?;

        debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            "{} complete", context
        );
        Ok(parsed.into_token())
    }
}

/// Check the state echoed by the OAuth callback against the one issued.
pub fn verify_state(expected: &str, received: &str) -> Result<()> {
    if expected.is_empty() || expected != received {
        return Err(Error::NotAuthenticated(
            "OAuth state mismatch".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OAuthClientConfig {
        OAuthClientConfig {
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:5173/blogger/oauth/callback".to_string(),
            auth_url: "https://accounts.google.com/o/oauth2/v2/auth".to_string(),
            token_url: "https://oauth2.googleapis.com/token".to_string(),
            timeout: Duration::from_secs(5),
        }
    }

    #[test]
    fn test_authorization_url() {
        let client = GoogleOAuthClient::new(config()).unwrap();
        let req = client.authorization_url();

        assert!(req
            .url
            .starts_with("https://accounts.google.com/o/oauth2/v2/auth?client_id=client-123&"));
        assert!(req.url.contains("response_type=code"));
        assert!(req.url.contains("access_type=offline"));
        assert!(req.url.contains("prompt=consent"));
        assert!(req
            .url
            .contains("scope=https%3A%2F%2Fwww.googleapis.com%2Fauth%2Fblogger"));
        assert!(req.url.contains(&format!("state={}", req.state)));
        assert!(Uuid::parse_str(&req.state).is_ok());
    }

    #[test]
    fn test_state_is_fresh() {
        let client = GoogleOAuthClient::new(config()).unwrap();
        assert_ne!(client.authorization_url().state, client.authorization_url().state);
    }

    #[test]
    fn test_verify_state() {
        assert!(verify_state("abc", "abc").is_ok());
        assert!(matches!(
            verify_state("abc", "xyz"),
            Err(Error::NotAuthenticated(_))
        ));
        assert!(verify_state("", "").is_err());
    }

    #[test]
    fn test_from_keys_requires_credentials() {
        let app = AppConfig::default();
        let mut keys = UserApiKeys::default();
        keys.google_client_id = Some("id".to_string());
        assert!(matches!(
            OAuthClientConfig::from_keys(&keys, &app),
            Err(Error::InvalidArgument(_))
        ));

        keys.google_client_secret = Some("secret".to_string());
        let cfg = OAuthClientConfig::from_keys(&keys, &app).unwrap();
        assert_eq!(cfg.token_url, app.google_token_url);
        assert_eq!(cfg.timeout, Duration::from_secs(app.http_timeout_secs));
    }

    #[test]
    fn test_token_response_defaults() {
        let parsed: TokenResponse =
            serde_json::from_str(r#"{"access_token": "a", "refresh_token": ""}"#).unwrap();
        let token = parsed.into_token();
        assert_eq!(token.expires_in, 3600);
        assert_eq!(token.token_type, "Bearer");
        assert!(token.refresh_token.is_none());
        assert!(!token.is_expired(Utc::now()));
    }

    #[test]
    fn test_config_debug_redacts_secret() {
        let debug = format!("{:?}", config());
        assert!(!debug.contains("\"secret\""));
        assert!(debug.contains("REDACTED"));
    }
}
