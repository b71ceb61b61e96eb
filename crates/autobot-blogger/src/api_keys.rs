//! Third-party API key format checks and the per-user key store.

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use autobot_core::{
    require_user, ApiKeyKind, ApiKeyRepository, Error, IdentityProvider, Result, UserApiKeys,
};

use crate::client::BloggerClient;
use crate::http::error_message;

const MIN_KEY_LENGTH: usize = 10;

static SUNO_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^[a-f0-9]{32}$").expect("valid regex"));
static CONTEXT7_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^ctx7sk-[a-f0-9-]{36}$").expect("valid regex"));
static OPENAI_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^sk-[a-zA-Z0-9]{20,}$").expect("valid regex"));

/// Outcome of a key check, with a user-facing message when invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiKeyValidation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiKeyValidation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Local format check. Google keys pass any format and are verified remotely.
pub fn validate_api_key(kind: ApiKeyKind, key: &str) -> ApiKeyValidation {
    let key = key.trim();
    if key.is_empty() {
        return ApiKeyValidation::invalid("API 키를 입력해주세요.");
    }
    if key.chars().count() < MIN_KEY_LENGTH {
        return ApiKeyValidation::invalid("API 키가 너무 짧습니다.");
    }

    match kind {
        ApiKeyKind::SunoApiKey if !SUNO_KEY.is_match(key) => ApiKeyValidation::invalid(
            "Suno API Key 형식이 올바르지 않습니다. (32자 hex 문자열)",
        ),
        ApiKeyKind::Context7ApiKey if !CONTEXT7_KEY.is_match(key) => {
            ApiKeyValidation::invalid("Context7 API Key 형식이 올바르지 않습니다.")
        }
        ApiKeyKind::OpenaiApiKey if !OPENAI_KEY.is_match(key) => {
            ApiKeyValidation::invalid("OpenAI API Key 형식이 올바르지 않습니다.")
        }
        _ => ApiKeyValidation::ok(),
    }
}

/// Check a Google API key against the Blogger API.
#[instrument(skip(client, api_key), fields(subsystem = "blogger", component = "api_keys", op = "verify_google_api_key"))]
pub async fn verify_google_api_key(client: &BloggerClient, api_key: &str) -> ApiKeyValidation {
    let (status, body) = match client.probe("/users/self/blogs", api_key.trim()).await {
        Ok(result) => result,
        Err(e) => {
            warn!(error = %e, "Google API key check could not reach Blogger");
            return ApiKeyValidation::invalid("API 키 검증 중 네트워크 오류가 발생했습니다.");
        }
    };

    debug!(http_status = status, "Google API key probe answered");
    match status {
        200..=299 => ApiKeyValidation::ok(),
        401 | 403 => ApiKeyValidation::invalid(
            "API 키가 유효하지 않거나 권한이 없습니다. Google Cloud Console에서 API 키를 확인해주세요.",
        ),
        400 => ApiKeyValidation::invalid(
            error_message(&body).unwrap_or_else(|| "API 키 형식이 올바르지 않습니다.".to_string()),
        ),
        other => ApiKeyValidation::invalid(format!(
            "API 키 검증 중 오류가 발생했습니다. (상태 코드: {})",
            other
        )),
    }
}

/// The signed-in user's API keys, validated before they are stored.
pub struct ApiKeyService {
    repo: Arc<dyn ApiKeyRepository>,
    identity: Arc<dyn IdentityProvider>,
}

impl ApiKeyService {
    pub fn new(repo: Arc<dyn ApiKeyRepository>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { repo, identity }
    }

    /// Stored keys, or an empty set when the user has none.
    pub async fn get(&self) -> Result<UserApiKeys> {
        let user_id = require_user(self.identity.as_ref()).await?;
        Ok(self.repo.get(user_id).await?.unwrap_or_default())
    }

    /// Set or clear one key. A blank value clears it.
    #[instrument(skip(self, value), fields(subsystem = "blogger", component = "api_keys", op = "set"))]
    pub async fn set(&self, kind: ApiKeyKind, value: Option<&str>) -> Result<UserApiKeys> {
        let user_id = require_user(self.identity.as_ref()).await?;
        let value = value.map(str::trim).filter(|v| !v.is_empty());

        if let Some(value) = value {
            let check = validate_api_key(kind, value);
            if !check.valid {
                return Err(Error::InvalidArgument(check.message.unwrap_or_default()));
            }
        }

        let mut keys = self.repo.get(user_id).await?.unwrap_or_default();
        keys.set(kind, value.map(str::to_string));
        let saved = self.repo.save(user_id, &keys).await?;
        info!(%user_id, key_type = kind.column(), cleared = value.is_none(), "Updated API key");
        Ok(saved)
    }

    /// Replace all keys at once, validating every non-blank value.
    pub async fn save_all(&self, keys: &UserApiKeys) -> Result<UserApiKeys> {
        let user_id = require_user(self.identity.as_ref()).await?;
        for kind in ApiKeyKind::ALL {
            if let Some(value) = keys.get(kind) {
                let check = validate_api_key(kind, value);
                if !check.valid {
                    return Err(Error::InvalidArgument(format!(
                        "{}: {}",
                        kind.column(),
                        check.message.unwrap_or_default()
                    )));
                }
            }
        }
        self.repo.save(user_id, keys).await
    }
}
