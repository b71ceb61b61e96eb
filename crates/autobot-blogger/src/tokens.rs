//! Per-user OAuth token lifecycle: save, refresh-on-expiry, revoke.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument, warn};

use autobot_core::defaults::{BLOGGER_SCOPE, PLACEHOLDER_BLOG_ID, PLACEHOLDER_BLOG_NAME};
use autobot_core::{
    require_user, BloggerAccount, BloggerAccountRepository, IdentityProvider, OAuthToken, Result,
};

use crate::oauth::GoogleOAuthClient;

/// Blogger token store scoped to the signed-in user.
///
/// Refreshing requires an OAuth client; without one an expired token is
/// reported as absent.
pub struct TokenManager {
    accounts: Arc<dyn BloggerAccountRepository>,
    identity: Arc<dyn IdentityProvider>,
    oauth: Option<Arc<GoogleOAuthClient>>,
}

impl TokenManager {
    pub fn new(
        accounts: Arc<dyn BloggerAccountRepository>,
        identity: Arc<dyn IdentityProvider>,
    ) -> Self {
        Self {
            accounts,
            identity,
            oauth: None,
        }
    }

    pub fn with_oauth(mut self, oauth: Arc<GoogleOAuthClient>) -> Self {
        self.oauth = Some(oauth);
        self
    }

    /// Store a freshly issued token, optionally with the chosen blog.
    #[instrument(skip(self, token, blog), fields(subsystem = "blogger", component = "tokens", op = "save"))]
    pub async fn save(
        &self,
        token: &OAuthToken,
        blog: Option<(&str, &str)>,
    ) -> Result<BloggerAccount> {
        let user_id = require_user(self.identity.as_ref()).await?;
        let (blog_id, blog_name) = blog.unwrap_or((PLACEHOLDER_BLOG_ID, PLACEHOLDER_BLOG_NAME));
        let account = self
            .accounts
            .save_token(user_id, token, blog_id, blog_name)
            .await?;
        info!(%user_id, blog_id, "Saved Blogger token");
        Ok(account)
    }

    /// Current usable access token, refreshing it when expired.
    #[instrument(skip(self), fields(subsystem = "blogger", component = "tokens", op = "valid_token"))]
    pub async fn valid_token(&self) -> Result<Option<OAuthToken>> {
        let user_id = require_user(self.identity.as_ref()).await?;
        let Some(account) = self.accounts.get(user_id).await? else {
            debug!(%user_id, "No Blogger token stored");
            return Ok(None);
        };

        let now = Utc::now();
        let stored = token_from_account(&account, now);
        if !stored.is_expired(now) {
            return Ok(Some(stored));
        }

        let Some(refresh_token) = account.refresh_token.as_deref() else {
            debug!(%user_id, "Token expired without refresh token");
            return Ok(None);
        };
        let Some(oauth) = self.oauth.as_ref() else {
            debug!(%user_id, "Token expired and no OAuth client configured");
            return Ok(None);
        };

        let mut refreshed = match oauth.refresh(refresh_token).await {
            Ok(token) => token,
            Err(e) => {
                warn!(%user_id, error = %e, "Token refresh failed");
                return Ok(None);
            }
        };
        if refreshed.refresh_token.is_none() {
            refreshed.refresh_token = Some(refresh_token.to_string());
        }

        self.accounts
            .save_token(user_id, &refreshed, &account.blog_id, &account.blog_name)
            .await?;
        info!(%user_id, "Refreshed Blogger token");
        Ok(Some(refreshed))
    }

    /// Forget the stored connection. Returns whether one existed.
    #[instrument(skip(self), fields(subsystem = "blogger", component = "tokens", op = "revoke"))]
    pub async fn revoke(&self) -> Result<bool> {
        let user_id = require_user(self.identity.as_ref()).await?;
        let removed = self.accounts.delete(user_id).await?;
        info!(%user_id, removed, "Revoked Blogger token");
        Ok(removed)
    }

    pub async fn attach_blog(&self, blog_id: &str, blog_name: &str) -> Result<()> {
        let user_id = require_user(self.identity.as_ref()).await?;
        self.accounts.set_blog(user_id, blog_id, blog_name).await
    }

    pub async fn account(&self) -> Result<Option<BloggerAccount>> {
        let user_id = require_user(self.identity.as_ref()).await?;
        self.accounts.get(user_id).await
    }
}

fn token_from_account(account: &BloggerAccount, now: chrono::DateTime<Utc>) -> OAuthToken {
    let expires_in = account
        .expires_at
        .map(|at| (at - now).num_seconds().max(0))
        .unwrap_or(autobot_core::defaults::TOKEN_DEFAULT_EXPIRES_IN_SECS);

    OAuthToken {
        access_token: account.access_token.clone(),
        refresh_token: account.refresh_token.clone(),
        expires_in,
        token_type: "Bearer".to_string(),
        scope: Some(BLOGGER_SCOPE.to_string()),
        expires_at: account.expires_at,
    }
}
