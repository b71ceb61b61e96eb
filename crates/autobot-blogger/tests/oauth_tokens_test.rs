//! OAuth token endpoint and token manager tests against a mock Google server.

use std::sync::Arc;
use std::time::Duration;

use autobot_blogger::{GoogleOAuthClient, OAuthClientConfig, TokenManager};
use autobot_core::{BloggerAccountRepository, Error, OAuthToken, StaticIdentity};
use autobot_db::InMemoryBloggerAccountRepository;
use chrono::Utc;
use uuid::Uuid;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn oauth_client(server: &MockServer) -> GoogleOAuthClient {
    GoogleOAuthClient::new(OAuthClientConfig {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        redirect_uri: "http://localhost:5173/blogger/oauth/callback".to_string(),
        auth_url: format!("{}/auth", server.uri()),
        token_url: format!("{}/token", server.uri()),
        timeout: Duration::from_secs(5),
    })
    .expect("Failed to create OAuth client")
}

fn expired_token(refresh: &str) -> OAuthToken {
    OAuthToken {
        access_token: "stale".to_string(),
        refresh_token: Some(refresh.to_string()),
        expires_in: 0,
        token_type: "Bearer".to_string(),
        scope: None,
        expires_at: Some(Utc::now() - chrono::Duration::minutes(5)),
    }
}

#[tokio::test]
async fn test_exchange_code_success() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=auth-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "ya29.access",
            "refresh_token": "1//refresh",
            "expires_in": 3599,
            "token_type": "Bearer",
            "scope": "https://www.googleapis.com/auth/blogger"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = oauth_client(&server)
        .exchange_code("auth-code")
        .await
        .expect("exchange should succeed");

    assert_eq!(token.access_token, "ya29.access");
    assert_eq!(token.refresh_token.as_deref(), Some("1//refresh"));
    assert_eq!(token.expires_in, 3599);
    let expires_at = token.expires_at.expect("expiry computed");
    assert!(expires_at > Utc::now() + chrono::Duration::seconds(3500));
}

#[tokio::test]
async fn test_exchange_code_error_carries_google_code() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant",
            "error_description": "Bad Request"
        })))
        .mount(&server)
        .await;

    let err = oauth_client(&server)
        .exchange_code("used-code")
        .await
        .expect_err("exchange should fail");

    match err {
        Error::UpstreamUnavailable(msg) => assert!(msg.contains("invalid_grant"), "{}", msg),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_valid_token_refreshes_and_keeps_refresh_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=keep-me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "fresh",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user_id = Uuid::new_v4();
    let accounts = Arc::new(InMemoryBloggerAccountRepository::new());
    accounts
        .save_token(user_id, &expired_token("keep-me"), "blog-9", "Travel Notes")
        .await
        .unwrap();

    let manager = TokenManager::new(accounts.clone(), Arc::new(StaticIdentity::signed_in(user_id)))
        .with_oauth(Arc::new(oauth_client(&server)));

    let token = manager
        .valid_token()
        .await
        .unwrap()
        .expect("refreshed token");
    assert_eq!(token.access_token, "fresh");
    assert_eq!(token.refresh_token.as_deref(), Some("keep-me"));

    let stored = accounts.get(user_id).await.unwrap().unwrap();
    assert_eq!(stored.access_token, "fresh");
    assert_eq!(stored.refresh_token.as_deref(), Some("keep-me"));
    assert_eq!(stored.blog_id, "blog-9");
    assert_eq!(stored.blog_name, "Travel Notes");
}

#[tokio::test]
async fn test_rejected_refresh_yields_no_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": "invalid_grant"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user_id = Uuid::new_v4();
    let accounts = Arc::new(InMemoryBloggerAccountRepository::new());
    accounts
        .save_token(user_id, &expired_token("revoked"), "temp", "Google Blogger")
        .await
        .unwrap();

    let manager = TokenManager::new(accounts.clone(), Arc::new(StaticIdentity::signed_in(user_id)))
        .with_oauth(Arc::new(oauth_client(&server)));

    assert!(manager.valid_token().await.unwrap().is_none());
    // The stored row is left untouched.
    let stored = accounts.get(user_id).await.unwrap().unwrap();
    assert_eq!(stored.access_token, "stale");
}
