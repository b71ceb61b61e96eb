//! Blogger client and API key verification against a mock Blogger API.

use std::time::Duration;

use autobot_blogger::{
    verify_google_api_key, BloggerAuth, BloggerClient, BloggerPostStatus, CreatePostRequest,
    UpdatePostRequest,
};
use autobot_core::Error;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> BloggerClient {
    BloggerClient::new(server.uri(), Duration::from_secs(5)).expect("Failed to create client")
}

fn post_json(id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "kind": "blogger#post",
        "id": id,
        "blog": {"id": "blog-1"},
        "title": "러스트 입문",
        "content": "<p>본문</p>",
        "url": "https://example.blogspot.com/2026/01/rust.html",
        "labels": ["rust"],
        "status": status
    })
}

#[tokio::test]
async fn test_list_my_blogs_uses_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/self/blogs"))
        .and(header("Authorization", "Bearer ya29.token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "kind": "blogger#blogList",
            "items": [{
                "id": "blog-1",
                "name": "My Blog",
                "url": "https://example.blogspot.com/",
                "posts": {"totalItems": 12, "selfLink": "https://example.com/posts"}
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let blogs = client(&server).list_my_blogs("ya29.token").await.unwrap();
    assert_eq!(blogs.len(), 1);
    assert_eq!(blogs[0].name, "My Blog");
    assert_eq!(blogs[0].posts.as_ref().unwrap().total_items, 12);
}

#[tokio::test]
async fn test_list_posts_with_api_key_defaults_to_ten() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blogs/blog-1/posts"))
        .and(query_param("key", "AIzaKey123"))
        .and(query_param("maxResults", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "kind": "blogger#postList",
            "items": [post_json("p1", "LIVE"), post_json("p2", "LIVE")]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let auth = BloggerAuth::ApiKey("AIzaKey123".to_string());
    let posts = client(&server).list_posts(&auth, "blog-1", None).await.unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].labels, vec!["rust".to_string()]);
}

#[tokio::test]
async fn test_create_draft_post() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/blogs/blog-1/posts"))
        .and(query_param("isDraft", "true"))
        .and(header("Authorization", "Bearer ya29.token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(post_json("p3", "DRAFT")))
        .expect(1)
        .mount(&server)
        .await;

    let req = CreatePostRequest {
        blog_id: "blog-1".to_string(),
        title: "러스트 입문".to_string(),
        content: "<p>본문</p>".to_string(),
        labels: vec!["rust".to_string()],
        publish: false,
    };
    let post = client(&server).create_post("ya29.token", &req).await.unwrap();
    assert_eq!(post.id, "p3");
    assert_eq!(post.status, Some(BloggerPostStatus::Draft));
}

#[tokio::test]
async fn test_update_post_publishes() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/blogs/blog-1/posts/p3"))
        .and(query_param("publish", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(post_json("p3", "LIVE")))
        .expect(1)
        .mount(&server)
        .await;

    let req = UpdatePostRequest {
        blog_id: "blog-1".to_string(),
        post_id: "p3".to_string(),
        title: "러스트 입문".to_string(),
        content: "<p>본문</p>".to_string(),
        labels: Vec::new(),
        publish: true,
    };
    let post = client(&server).update_post("ya29.token", &req).await.unwrap();
    assert_eq!(post.status, Some(BloggerPostStatus::Live));
}

#[tokio::test]
async fn test_status_mapping() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/blogs/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": 404, "message": "Blog not found"}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blogs/private"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/blogs/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = client(&server);
    let auth = BloggerAuth::ApiKey("AIzaKey123".to_string());

    match client.get_blog(&auth, "missing").await {
        Err(Error::NotFound(msg)) => assert!(msg.contains("Blog not found")),
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert!(matches!(
        client.get_blog(&auth, "private").await,
        Err(Error::NotAuthenticated(_))
    ));
    assert!(matches!(
        client.get_blog(&auth, "flaky").await,
        Err(Error::UpstreamUnavailable(_))
    ));
}

#[tokio::test]
async fn test_delete_post() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/blogs/blog-1/posts/p3"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client(&server)
        .delete_post("ya29.token", "blog-1", "p3")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_verify_google_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/self/blogs"))
        .and(query_param("key", "good-key-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/self/blogs"))
        .and(query_param("key", "denied-key-123"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/self/blogs"))
        .and(query_param("key", "malformed-key"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {"code": 400, "message": "API key not valid."}
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/self/blogs"))
        .and(query_param("key", "server-error-key"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = client(&server);

    assert!(verify_google_api_key(&client, "good-key-123").await.valid);

    let denied = verify_google_api_key(&client, "denied-key-123").await;
    assert!(!denied.valid);
    assert!(denied.message.unwrap().starts_with("API 키가 유효하지 않거나"));

    let malformed = verify_google_api_key(&client, "malformed-key").await;
    assert_eq!(malformed.message.as_deref(), Some("API key not valid."));

    let failed = verify_google_api_key(&client, "server-error-key").await;
    assert_eq!(
        failed.message.as_deref(),
        Some("API 키 검증 중 오류가 발생했습니다. (상태 코드: 500)")
    );
}

#[tokio::test]
async fn test_verify_google_api_key_network_error() {
    // Nothing listens on port 1.
    let client = BloggerClient::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let result = verify_google_api_key(&client, "any-key-12345").await;
    assert!(!result.valid);
    assert_eq!(
        result.message.as_deref(),
        Some("API 키 검증 중 네트워크 오류가 발생했습니다.")
    );
}
